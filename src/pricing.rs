//! Pricing
//!
//! Total price for a rental of `duration` units, computed as
//! `rate_for(unit) * duration` on the listing's rate card. Money is
//! exact minor-unit arithmetic; the only rounding in the crate happens
//! when a rate is derived from the day rate (see [`crate::rates`]).

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

use crate::{errors::ValidationError, products::Product, rates::DurationUnit};

/// Total price for renting `product` for `duration` units of `unit`.
///
/// Linear in duration; there are no discount tiers.
///
/// # Errors
///
/// - [`ValidationError::NonPositiveDuration`] if `duration <= 0`.
/// - [`ValidationError::AmountOutOfRange`] if the total does not fit in
///   minor currency units.
pub fn calculate_price(
    product: &Product,
    duration: i64,
    unit: DurationUnit,
) -> Result<Money<'static, Currency>, ValidationError> {
    if duration <= 0 {
        return Err(ValidationError::NonPositiveDuration(duration));
    }

    let rate = product.rates().rate_for(unit)?;

    let total_minor = Decimal::from(rate.to_minor_units())
        .checked_mul(Decimal::from(duration))
        .and_then(|total| total.to_i64())
        .ok_or(ValidationError::AmountOutOfRange)?;

    Ok(Money::from_minor(total_minor, rate.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use testresult::TestResult;

    use crate::{categories::Category, products::UserKey, rates::RateCard};

    use super::*;

    fn day_rate_product(day_minor: i64) -> Result<Product, ValidationError> {
        let rates = RateCard::new(Money::from_minor(day_minor, BDT))?;

        Ok(Product::new(
            "DJI Mavic 3",
            Category::Drone,
            rates,
            UserKey::default(),
        ))
    }

    #[test]
    fn five_days_at_twenty_is_one_hundred() -> TestResult {
        let product = day_rate_product(2000)?;

        let price = calculate_price(&product, 5, DurationUnit::Day)?;

        assert_eq!(price, Money::from_minor(10_000, BDT));

        Ok(())
    }

    #[test]
    fn price_is_linear_in_duration() -> TestResult {
        let product = day_rate_product(1300)?;

        let single = calculate_price(&product, 3, DurationUnit::Day)?;
        let double = calculate_price(&product, 6, DurationUnit::Day)?;

        assert_eq!(
            double,
            single.add(single)?,
            "doubling the duration must double the price"
        );

        Ok(())
    }

    #[test]
    fn zero_duration_is_rejected() -> TestResult {
        let product = day_rate_product(2000)?;

        let err = calculate_price(&product, 0, DurationUnit::Day).err();

        assert!(matches!(err, Some(ValidationError::NonPositiveDuration(0))));

        Ok(())
    }

    #[test]
    fn negative_duration_is_rejected() -> TestResult {
        let product = day_rate_product(2000)?;

        let err = calculate_price(&product, -3, DurationUnit::Hour).err();

        assert!(matches!(err, Some(ValidationError::NonPositiveDuration(-3))));

        Ok(())
    }

    #[test]
    fn weekly_price_uses_derived_rate() -> TestResult {
        let product = day_rate_product(2000)?;

        // No explicit weekly rate: week = 7 x day, so 2 weeks = 14 days.
        let price = calculate_price(&product, 2, DurationUnit::Week)?;

        assert_eq!(price, Money::from_minor(28_000, BDT));

        Ok(())
    }

    #[test]
    fn explicit_weekly_rate_shadows_derivation() -> TestResult {
        let rates = RateCard::new(Money::from_minor(2000, BDT))?
            .with_week(Money::from_minor(9000, BDT))?;

        let product = Product::new("Tent", Category::Tent, rates, UserKey::default());

        let price = calculate_price(&product, 2, DurationUnit::Week)?;

        assert_eq!(price, Money::from_minor(18_000, BDT));

        Ok(())
    }
}
