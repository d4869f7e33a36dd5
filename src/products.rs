//! Products
//!
//! Listing records. Fields are private; status changes go through the
//! [`crate::lifecycle`] module so the transition tables cannot be
//! bypassed.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::{categories::Category, errors::ValidationError, rates::RateCard};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// User Key
    pub struct UserKey;
}

/// Review lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Being drafted by the owner; not yet submitted.
    Draft,

    /// Submitted, awaiting an admin decision.
    PendingReview,

    /// Approved and bookable.
    Active,

    /// Declined by an admin; requires re-submission.
    Rejected,

    /// Taken off the marketplace by its owner.
    Inactive,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ProductStatus::Draft => "draft",
            ProductStatus::PendingReview => "pending_review",
            ProductStatus::Active => "active",
            ProductStatus::Rejected => "rejected",
            ProductStatus::Inactive => "inactive",
        };

        f.write_str(code)
    }
}

/// A listed piece of equipment.
#[derive(Debug, Clone)]
pub struct Product {
    title: String,
    category: Category,
    rates: RateCard,
    security_deposit: Option<Money<'static, Currency>>,
    status: ProductStatus,
    status_message: Option<String>,
    average_rating: Decimal,
    views_count: u64,
    owner: UserKey,
}

impl Product {
    /// Create a new listing in `Draft` with zero views and no rating.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        category: Category,
        rates: RateCard,
        owner: UserKey,
    ) -> Self {
        Product {
            title: title.into(),
            category,
            rates,
            security_deposit: None,
            status: ProductStatus::Draft,
            status_message: None,
            average_rating: Decimal::ZERO,
            views_count: 0,
            owner,
        }
    }

    /// Attach a security deposit.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the deposit is negative or in a
    /// different currency than the rate card.
    pub fn with_security_deposit(
        mut self,
        deposit: Money<'static, Currency>,
    ) -> Result<Self, ValidationError> {
        self.set_security_deposit(Some(deposit))?;

        Ok(self)
    }

    /// Change or clear the security deposit on the listing.
    ///
    /// Existing rentals keep their deposit snapshots; only future
    /// bookings see the new value.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the deposit is negative or in a
    /// different currency than the rate card.
    pub fn set_security_deposit(
        &mut self,
        deposit: Option<Money<'static, Currency>>,
    ) -> Result<(), ValidationError> {
        if let Some(deposit) = deposit {
            if deposit.to_minor_units() < 0 {
                return Err(ValidationError::NegativeDeposit);
            }

            if deposit.currency() != self.rates.currency() {
                return Err(ValidationError::CurrencyMismatch {
                    expected: self.rates.currency().iso_alpha_code,
                    found: deposit.currency().iso_alpha_code,
                });
            }
        }

        self.security_deposit = deposit;

        Ok(())
    }

    /// Listing title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Equipment category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Per-unit rental rates.
    #[must_use]
    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Security deposit, if the owner requires one.
    #[must_use]
    pub fn security_deposit(&self) -> Option<Money<'static, Currency>> {
        self.security_deposit
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> ProductStatus {
        self.status
    }

    /// Message recorded with the most recent status change, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Average review rating, externally recomputed.
    #[must_use]
    pub fn average_rating(&self) -> Decimal {
        self.average_rating
    }

    /// Number of times the listing has been viewed.
    #[must_use]
    pub fn views_count(&self) -> u64 {
        self.views_count
    }

    /// Owner of the listing.
    #[must_use]
    pub fn owner(&self) -> UserKey {
        self.owner
    }

    /// Bump the view counter, returning the new count.
    pub fn increment_views(&mut self) -> u64 {
        self.views_count = self.views_count.saturating_add(1);
        self.views_count
    }

    /// Record a recomputed average rating, rounded half-up to two
    /// decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RatingOutOfRange`] for values outside
    /// `0..=5`.
    pub fn update_average_rating(&mut self, rating: Decimal) -> Result<(), ValidationError> {
        if rating < Decimal::ZERO || rating > Decimal::from(5) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }

        self.average_rating =
            rating.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: ProductStatus) {
        self.status = status;
    }

    pub(crate) fn set_status_message(&mut self, message: Option<String>) {
        self.status_message = message;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{BDT, USD};
    use testresult::TestResult;

    use super::*;

    fn test_product() -> Result<Product, ValidationError> {
        let rates = RateCard::new(Money::from_minor(2000, BDT))?;

        Ok(Product::new(
            "Canon EOS 90D",
            Category::Camera,
            rates,
            UserKey::default(),
        ))
    }

    #[test]
    fn new_listing_starts_in_draft() -> TestResult {
        let product = test_product()?;

        assert_eq!(product.status(), ProductStatus::Draft);
        assert_eq!(product.views_count(), 0);
        assert_eq!(product.average_rating(), Decimal::ZERO);
        assert!(product.security_deposit().is_none());

        Ok(())
    }

    #[test]
    fn increment_views_is_monotonic() -> TestResult {
        let mut product = test_product()?;

        assert_eq!(product.increment_views(), 1);
        assert_eq!(product.increment_views(), 2);
        assert_eq!(product.views_count(), 2);

        Ok(())
    }

    #[test]
    fn rating_bounds_are_inclusive() -> TestResult {
        let mut product = test_product()?;

        product.update_average_rating(Decimal::ZERO)?;
        product.update_average_rating(Decimal::from(5))?;

        assert_eq!(product.average_rating(), Decimal::from(5));

        Ok(())
    }

    #[test]
    fn rating_outside_range_is_rejected() -> TestResult {
        let mut product = test_product()?;

        // 5.01 and -0.01
        let too_high = product.update_average_rating(Decimal::new(501, 2)).err();
        let too_low = product.update_average_rating(Decimal::new(-1, 2)).err();

        assert!(matches!(too_high, Some(ValidationError::RatingOutOfRange(_))));
        assert!(matches!(too_low, Some(ValidationError::RatingOutOfRange(_))));

        Ok(())
    }

    #[test]
    fn rating_rounds_half_up_to_two_places() -> TestResult {
        let mut product = test_product()?;

        // 4.005 rounds to 4.01
        product.update_average_rating(Decimal::new(4005, 3))?;

        assert_eq!(product.average_rating(), Decimal::new(401, 2));

        Ok(())
    }

    #[test]
    fn negative_deposit_is_rejected() -> TestResult {
        let err = test_product()?
            .with_security_deposit(Money::from_minor(-500, BDT))
            .err();

        assert!(matches!(err, Some(ValidationError::NegativeDeposit)));

        Ok(())
    }

    #[test]
    fn deposit_currency_must_match_rates() -> TestResult {
        let err = test_product()?
            .with_security_deposit(Money::from_minor(500, USD))
            .err();

        assert!(matches!(
            err,
            Some(ValidationError::CurrencyMismatch {
                expected: "BDT",
                found: "USD"
            })
        ));

        Ok(())
    }

    #[test]
    fn status_codes_render_snake_case() {
        assert_eq!(ProductStatus::PendingReview.to_string(), "pending_review");
        assert_eq!(ProductStatus::Draft.to_string(), "draft");
    }
}
