//! Rentals
//!
//! Booking records. A rental's total price and security deposit are
//! snapshots taken at creation time, so later listing changes never
//! retroactively alter an existing booking. Status changes go through
//! [`crate::lifecycle`].

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::{
    errors::{EngineError, InvalidRangeError, ValidationError},
    products::{ProductKey, UserKey},
};

new_key_type! {
    /// Rental Key
    pub struct RentalKey;
}

/// Lifecycle state of a rental request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Requested by the renter, awaiting the owner's decision.
    Pending,

    /// Approved by the owner.
    Accepted,

    /// Declined by the owner.
    Rejected,

    /// Withdrawn before the start time by either party.
    Cancelled,

    /// Finished; the interval is kept for audit.
    Completed,

    /// Currently running.
    InProgress,
}

impl RentalStatus {
    /// Whether a rental in this status reserves its date range against
    /// new overlapping bookings.
    #[must_use]
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            RentalStatus::Pending | RentalStatus::Accepted | RentalStatus::InProgress
        )
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Accepted => "accepted",
            RentalStatus::Rejected => "rejected",
            RentalStatus::Cancelled => "cancelled",
            RentalStatus::Completed => "completed",
            RentalStatus::InProgress => "in_progress",
        };

        f.write_str(code)
    }
}

/// A rental request over a half-open interval `[start, end)`.
#[derive(Debug, Clone)]
pub struct Rental {
    product: ProductKey,
    owner: UserKey,
    renter: UserKey,
    start: Timestamp,
    end: Timestamp,
    status: RentalStatus,
    total_price: Money<'static, Currency>,
    security_deposit: Option<Money<'static, Currency>>,
    notes: Option<String>,
}

impl Rental {
    /// Create a `Pending` rental with price and deposit snapshots
    /// already computed.
    ///
    /// # Errors
    ///
    /// - [`InvalidRangeError`] if `end` is not strictly after `start`.
    /// - [`ValidationError::RenterIsOwner`] if the renter is the owner.
    pub fn new(
        product: ProductKey,
        owner: UserKey,
        renter: UserKey,
        start: Timestamp,
        end: Timestamp,
        total_price: Money<'static, Currency>,
        security_deposit: Option<Money<'static, Currency>>,
    ) -> Result<Self, EngineError> {
        if end <= start {
            return Err(InvalidRangeError { start, end }.into());
        }

        if renter == owner {
            return Err(ValidationError::RenterIsOwner.into());
        }

        Ok(Rental {
            product,
            owner,
            renter,
            start,
            end,
            status: RentalStatus::Pending,
            total_price,
            security_deposit,
            notes: None,
        })
    }

    /// Attach free-text notes from the renter.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Product being rented.
    #[must_use]
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Listing owner at booking time.
    #[must_use]
    pub fn owner(&self) -> UserKey {
        self.owner
    }

    /// Renting user.
    #[must_use]
    pub fn renter(&self) -> UserKey {
        self.renter
    }

    /// Start of the rented interval.
    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// End of the rented interval (exclusive).
    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// The rented half-open interval as a pair.
    #[must_use]
    pub fn interval(&self) -> (Timestamp, Timestamp) {
        (self.start, self.end)
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> RentalStatus {
        self.status
    }

    /// Price snapshot computed when the rental was created.
    #[must_use]
    pub fn total_price(&self) -> Money<'static, Currency> {
        self.total_price
    }

    /// Deposit snapshot copied from the listing at creation, if any.
    #[must_use]
    pub fn security_deposit(&self) -> Option<Money<'static, Currency>> {
        self.security_deposit
    }

    /// Renter notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: RentalStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use slotmap::KeyData;
    use testresult::TestResult;

    use super::*;

    fn user(id: u64) -> UserKey {
        UserKey::from(KeyData::from_ffi(id))
    }

    fn ts(s: &str) -> Result<Timestamp, jiff::Error> {
        s.parse()
    }

    #[test]
    fn new_rental_starts_pending() -> TestResult {
        let rental = Rental::new(
            ProductKey::default(),
            user(1),
            user(2),
            ts("2025-06-01T00:00:00Z")?,
            ts("2025-06-05T00:00:00Z")?,
            Money::from_minor(8000, BDT),
            Some(Money::from_minor(5000, BDT)),
        )?;

        assert_eq!(rental.status(), RentalStatus::Pending);
        assert_eq!(rental.total_price(), Money::from_minor(8000, BDT));
        assert_eq!(rental.security_deposit(), Some(Money::from_minor(5000, BDT)));
        assert!(rental.notes().is_none());

        Ok(())
    }

    #[test]
    fn end_must_be_strictly_after_start() -> TestResult {
        let instant = ts("2025-06-01T00:00:00Z")?;

        let err = Rental::new(
            ProductKey::default(),
            user(1),
            user(2),
            instant,
            instant,
            Money::from_minor(8000, BDT),
            None,
        )
        .err();

        assert!(matches!(err, Some(EngineError::InvalidRange(_))));

        Ok(())
    }

    #[test]
    fn renter_must_differ_from_owner() -> TestResult {
        let err = Rental::new(
            ProductKey::default(),
            user(1),
            user(1),
            ts("2025-06-01T00:00:00Z")?,
            ts("2025-06-05T00:00:00Z")?,
            Money::from_minor(8000, BDT),
            None,
        )
        .err();

        assert!(matches!(
            err,
            Some(EngineError::Validation(ValidationError::RenterIsOwner))
        ));

        Ok(())
    }

    #[test]
    fn blocking_statuses_reserve_the_range() {
        assert!(RentalStatus::Pending.is_blocking());
        assert!(RentalStatus::Accepted.is_blocking());
        assert!(RentalStatus::InProgress.is_blocking());

        assert!(!RentalStatus::Rejected.is_blocking());
        assert!(!RentalStatus::Cancelled.is_blocking());
        assert!(!RentalStatus::Completed.is_blocking());
    }

    #[test]
    fn notes_are_attached_verbatim() -> TestResult {
        let rental = Rental::new(
            ProductKey::default(),
            user(1),
            user(2),
            ts("2025-06-01T00:00:00Z")?,
            ts("2025-06-05T00:00:00Z")?,
            Money::from_minor(8000, BDT),
            None,
        )?
        .with_notes("needed for a wedding shoot");

        assert_eq!(rental.notes(), Some("needed for a wedding shoot"));

        Ok(())
    }
}
