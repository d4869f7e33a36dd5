//! Lifecycle
//!
//! The product and rental state machines. These functions are the only
//! writers of status fields; every transition outside the tables below
//! fails with [`InvalidTransitionError`] naming the current and
//! requested states.
//!
//! Product:
//!
//! ```text
//! draft --submit_for_review--> pending_review
//! pending_review --approve--> active
//! pending_review --reject--> rejected
//! active --deactivate--> inactive
//! inactive --reactivate--> active
//! ```
//!
//! Rental:
//!
//! ```text
//! pending --accept--> accepted            (re-checks availability)
//! pending --reject--> rejected
//! accepted --start--> in_progress         (start time reached)
//! in_progress --complete--> completed     (end time reached)
//! pending|accepted --cancel--> cancelled  (before start time only)
//! ```

use jiff::Timestamp;

use crate::{
    availability::is_range_available,
    errors::{EngineError, InvalidTransitionError, ValidationError},
    products::{Product, ProductStatus},
    rentals::{Rental, RentalStatus},
};

/// Submit a drafted listing for admin review.
///
/// Re-submitting an already-pending listing is an error, not a no-op.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] unless the listing is in `Draft`.
pub fn submit_for_review(product: &mut Product) -> Result<(), InvalidTransitionError> {
    update_product_status(product, ProductStatus::PendingReview, None)
}

/// Move a listing to `requested`, recording an optional status message.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] if the edge is not in the product
/// transition table.
pub fn update_product_status(
    product: &mut Product,
    requested: ProductStatus,
    message: Option<&str>,
) -> Result<(), InvalidTransitionError> {
    let current = product.status();

    if !legal_product_transition(current, requested) {
        return Err(InvalidTransitionError::Product { current, requested });
    }

    product.set_status(requested);
    product.set_status_message(message.map(str::to_string));

    Ok(())
}

fn legal_product_transition(current: ProductStatus, requested: ProductStatus) -> bool {
    matches!(
        (current, requested),
        (ProductStatus::Draft, ProductStatus::PendingReview)
            | (ProductStatus::PendingReview, ProductStatus::Active)
            | (ProductStatus::PendingReview, ProductStatus::Rejected)
            | (ProductStatus::Active, ProductStatus::Inactive)
            | (ProductStatus::Inactive, ProductStatus::Active)
    )
}

/// Owner accepts a pending rental.
///
/// Acceptance re-checks that the rental's range is still free of the
/// product's *other* blocking rentals; a concurrently accepted
/// overlapping booking invalidates the request.
///
/// # Errors
///
/// - [`InvalidTransitionError`] if the rental is not `Pending`.
/// - [`ValidationError::RangeUnavailable`] if the range was taken in
///   the meantime.
pub fn accept_rental(
    rental: &mut Rental,
    other_blocking: &[(Timestamp, Timestamp)],
) -> Result<(), EngineError> {
    require_rental_status(rental, RentalStatus::Pending, RentalStatus::Accepted)?;

    let (start, end) = rental.interval();

    if !is_range_available(other_blocking, start, end)? {
        return Err(ValidationError::RangeUnavailable { start, end }.into());
    }

    rental.set_status(RentalStatus::Accepted);

    Ok(())
}

/// Owner rejects a pending rental.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] if the rental is not `Pending`.
pub fn reject_rental(rental: &mut Rental) -> Result<(), InvalidTransitionError> {
    require_rental_status(rental, RentalStatus::Pending, RentalStatus::Rejected)?;
    rental.set_status(RentalStatus::Rejected);

    Ok(())
}

/// Mark an accepted rental as running once its start time is reached.
///
/// # Errors
///
/// - [`InvalidTransitionError::Rental`] if the rental is not `Accepted`.
/// - [`InvalidTransitionError::StartTimeNotReached`] if `now` is before
///   the start time.
pub fn start_rental(rental: &mut Rental, now: Timestamp) -> Result<(), InvalidTransitionError> {
    require_rental_status(rental, RentalStatus::Accepted, RentalStatus::InProgress)?;

    if now < rental.start() {
        return Err(InvalidTransitionError::StartTimeNotReached {
            start: rental.start(),
            now,
        });
    }

    rental.set_status(RentalStatus::InProgress);

    Ok(())
}

/// Mark a running rental as completed once its end time is reached.
///
/// # Errors
///
/// - [`InvalidTransitionError::Rental`] if the rental is not `InProgress`.
/// - [`InvalidTransitionError::EndTimeNotReached`] if `now` is before
///   the end time.
pub fn complete_rental(rental: &mut Rental, now: Timestamp) -> Result<(), InvalidTransitionError> {
    require_rental_status(rental, RentalStatus::InProgress, RentalStatus::Completed)?;

    if now < rental.end() {
        return Err(InvalidTransitionError::EndTimeNotReached {
            end: rental.end(),
            now,
        });
    }

    rental.set_status(RentalStatus::Completed);

    Ok(())
}

/// Either party cancels a rental before it starts.
///
/// # Errors
///
/// - [`InvalidTransitionError::Rental`] if the rental is not `Pending`
///   or `Accepted`.
/// - [`InvalidTransitionError::CancelAfterStart`] if `now` is at or
///   after the start time.
pub fn cancel_rental(rental: &mut Rental, now: Timestamp) -> Result<(), InvalidTransitionError> {
    let current = rental.status();

    if !matches!(current, RentalStatus::Pending | RentalStatus::Accepted) {
        return Err(InvalidTransitionError::Rental {
            current,
            requested: RentalStatus::Cancelled,
        });
    }

    if now >= rental.start() {
        return Err(InvalidTransitionError::CancelAfterStart {
            start: rental.start(),
            now,
        });
    }

    rental.set_status(RentalStatus::Cancelled);

    Ok(())
}

fn require_rental_status(
    rental: &Rental,
    expected: RentalStatus,
    requested: RentalStatus,
) -> Result<(), InvalidTransitionError> {
    let current = rental.status();

    if current == expected {
        Ok(())
    } else {
        Err(InvalidTransitionError::Rental { current, requested })
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::{Money, iso::BDT};
    use slotmap::KeyData;
    use testresult::TestResult;

    use crate::{
        categories::Category,
        products::{ProductKey, UserKey},
        rates::RateCard,
    };

    use super::*;

    fn user(id: u64) -> UserKey {
        UserKey::from(KeyData::from_ffi(id))
    }

    fn ts(s: &str) -> Result<Timestamp, jiff::Error> {
        s.parse()
    }

    fn draft_product() -> TestResult<Product> {
        let rates = RateCard::new(Money::from_minor(2000, BDT))?;

        Ok(Product::new(
            "PA Speaker",
            Category::Speaker,
            rates,
            user(1),
        ))
    }

    fn pending_rental() -> TestResult<Rental> {
        Ok(Rental::new(
            ProductKey::default(),
            user(1),
            user(2),
            ts("2025-06-01T00:00:00Z")?,
            ts("2025-06-05T00:00:00Z")?,
            Money::from_minor(8000, BDT),
            None,
        )?)
    }

    #[test]
    fn draft_cannot_jump_straight_to_active() -> TestResult {
        let mut product = draft_product()?;

        let err = update_product_status(&mut product, ProductStatus::Active, None).err();

        assert!(matches!(
            err,
            Some(InvalidTransitionError::Product {
                current: ProductStatus::Draft,
                requested: ProductStatus::Active,
            })
        ));

        Ok(())
    }

    #[test]
    fn pending_review_approves_to_active() -> TestResult {
        let mut product = draft_product()?;

        submit_for_review(&mut product)?;
        update_product_status(&mut product, ProductStatus::Active, Some("looks good"))?;

        assert_eq!(product.status(), ProductStatus::Active);
        assert_eq!(product.status_message(), Some("looks good"));

        Ok(())
    }

    #[test]
    fn double_submit_fails_the_second_time() -> TestResult {
        let mut product = draft_product()?;

        submit_for_review(&mut product)?;
        let err = submit_for_review(&mut product).err();

        assert!(matches!(
            err,
            Some(InvalidTransitionError::Product {
                current: ProductStatus::PendingReview,
                requested: ProductStatus::PendingReview,
            })
        ));

        Ok(())
    }

    #[test]
    fn rejected_listing_cannot_be_resurrected_directly() -> TestResult {
        let mut product = draft_product()?;

        submit_for_review(&mut product)?;
        update_product_status(&mut product, ProductStatus::Rejected, Some("blurry photos"))?;

        let err = update_product_status(&mut product, ProductStatus::Active, None).err();

        assert!(matches!(
            err,
            Some(InvalidTransitionError::Product { .. })
        ));

        Ok(())
    }

    #[test]
    fn active_listing_can_be_deactivated_and_reactivated() -> TestResult {
        let mut product = draft_product()?;

        submit_for_review(&mut product)?;
        update_product_status(&mut product, ProductStatus::Active, None)?;
        update_product_status(&mut product, ProductStatus::Inactive, None)?;
        update_product_status(&mut product, ProductStatus::Active, None)?;

        assert_eq!(product.status(), ProductStatus::Active);

        Ok(())
    }

    #[test]
    fn accept_with_free_range_succeeds() -> TestResult {
        let mut rental = pending_rental()?;

        accept_rental(&mut rental, &[])?;

        assert_eq!(rental.status(), RentalStatus::Accepted);

        Ok(())
    }

    #[test]
    fn accept_fails_when_range_was_taken_meanwhile() -> TestResult {
        let mut rental = pending_rental()?;

        let other = [(
            ts("2025-06-03T00:00:00Z")?,
            ts("2025-06-08T00:00:00Z")?,
        )];

        let err = accept_rental(&mut rental, &other).err();

        assert!(matches!(
            err,
            Some(EngineError::Validation(
                ValidationError::RangeUnavailable { .. }
            ))
        ));
        assert_eq!(rental.status(), RentalStatus::Pending, "status unchanged");

        Ok(())
    }

    #[test]
    fn accept_twice_fails() -> TestResult {
        let mut rental = pending_rental()?;

        accept_rental(&mut rental, &[])?;
        let err = accept_rental(&mut rental, &[]).err();

        assert!(matches!(
            err,
            Some(EngineError::InvalidTransition(
                InvalidTransitionError::Rental {
                    current: RentalStatus::Accepted,
                    requested: RentalStatus::Accepted,
                }
            ))
        ));

        Ok(())
    }

    #[test]
    fn reject_only_from_pending() -> TestResult {
        let mut rental = pending_rental()?;

        accept_rental(&mut rental, &[])?;
        let err = reject_rental(&mut rental).err();

        assert!(matches!(err, Some(InvalidTransitionError::Rental { .. })));

        Ok(())
    }

    #[test]
    fn start_requires_reaching_start_time() -> TestResult {
        let mut rental = pending_rental()?;
        accept_rental(&mut rental, &[])?;

        let early = start_rental(&mut rental, ts("2025-05-31T23:00:00Z")?).err();
        assert!(matches!(
            early,
            Some(InvalidTransitionError::StartTimeNotReached { .. })
        ));

        start_rental(&mut rental, ts("2025-06-01T00:00:00Z")?)?;
        assert_eq!(rental.status(), RentalStatus::InProgress);

        Ok(())
    }

    #[test]
    fn complete_requires_reaching_end_time() -> TestResult {
        let mut rental = pending_rental()?;
        accept_rental(&mut rental, &[])?;
        start_rental(&mut rental, ts("2025-06-01T00:00:00Z")?)?;

        let early = complete_rental(&mut rental, ts("2025-06-04T00:00:00Z")?).err();
        assert!(matches!(
            early,
            Some(InvalidTransitionError::EndTimeNotReached { .. })
        ));

        complete_rental(&mut rental, ts("2025-06-05T00:00:00Z")?)?;
        assert_eq!(rental.status(), RentalStatus::Completed);

        Ok(())
    }

    #[test]
    fn cancel_before_start_from_pending_and_accepted() -> TestResult {
        let mut pending = pending_rental()?;
        cancel_rental(&mut pending, ts("2025-05-20T00:00:00Z")?)?;
        assert_eq!(pending.status(), RentalStatus::Cancelled);

        let mut accepted = pending_rental()?;
        accept_rental(&mut accepted, &[])?;
        cancel_rental(&mut accepted, ts("2025-05-20T00:00:00Z")?)?;
        assert_eq!(accepted.status(), RentalStatus::Cancelled);

        Ok(())
    }

    #[test]
    fn cancel_at_or_after_start_fails() -> TestResult {
        let mut rental = pending_rental()?;

        let err = cancel_rental(&mut rental, ts("2025-06-01T00:00:00Z")?).err();

        assert!(matches!(
            err,
            Some(InvalidTransitionError::CancelAfterStart { .. })
        ));

        Ok(())
    }

    #[test]
    fn cancel_in_progress_fails() -> TestResult {
        let mut rental = pending_rental()?;
        accept_rental(&mut rental, &[])?;
        start_rental(&mut rental, ts("2025-06-01T00:00:00Z")?)?;

        let err = cancel_rental(&mut rental, ts("2025-06-02T00:00:00Z")?).err();

        assert!(matches!(
            err,
            Some(InvalidTransitionError::Rental {
                current: RentalStatus::InProgress,
                requested: RentalStatus::Cancelled,
            })
        ));

        Ok(())
    }
}
