//! Duration units and rate cards
//!
//! A listing prices rentals per duration unit. The day rate is mandatory;
//! hour/week/month rates are optional and, when absent, derive from the
//! day rate with one fixed policy: hour = day/24 (rounded half-up to
//! minor units), week = 7 x day, month = 30 x day. An explicit rate
//! always wins over a derived one.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Pricing granularity of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Priced per hour.
    Hour,

    /// Priced per day.
    Day,

    /// Priced per week.
    Week,

    /// Priced per month.
    Month,
}

impl DurationUnit {
    /// Every recognised unit.
    pub const ALL: [DurationUnit; 4] = [
        DurationUnit::Hour,
        DurationUnit::Day,
        DurationUnit::Week,
        DurationUnit::Month,
    ];

    /// Stable unit code, the form exchanged with collaborators.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            DurationUnit::Hour => "hour",
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DurationUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DurationUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.code() == s)
            .ok_or_else(|| ValidationError::UnknownUnit(s.to_string()))
    }
}

/// Per-unit rental rates of a listing.
///
/// All rates share one currency, fixed by the mandatory day rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    day: Money<'static, Currency>,
    hour: Option<Money<'static, Currency>>,
    week: Option<Money<'static, Currency>>,
    month: Option<Money<'static, Currency>>,
}

impl RateCard {
    /// Create a rate card from the mandatory day rate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeRate`] if the rate is below zero.
    pub fn new(day: Money<'static, Currency>) -> Result<Self, ValidationError> {
        ensure_non_negative(&day)?;

        Ok(RateCard {
            day,
            hour: None,
            week: None,
            month: None,
        })
    }

    /// Set an explicit hourly rate.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the rate is negative or in a
    /// different currency than the day rate.
    pub fn with_hour(mut self, rate: Money<'static, Currency>) -> Result<Self, ValidationError> {
        self.check_extra_rate(&rate)?;
        self.hour = Some(rate);

        Ok(self)
    }

    /// Set an explicit weekly rate.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the rate is negative or in a
    /// different currency than the day rate.
    pub fn with_week(mut self, rate: Money<'static, Currency>) -> Result<Self, ValidationError> {
        self.check_extra_rate(&rate)?;
        self.week = Some(rate);

        Ok(self)
    }

    /// Set an explicit monthly rate.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the rate is negative or in a
    /// different currency than the day rate.
    pub fn with_month(mut self, rate: Money<'static, Currency>) -> Result<Self, ValidationError> {
        self.check_extra_rate(&rate)?;
        self.month = Some(rate);

        Ok(self)
    }

    /// Currency shared by every rate on the card.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.day.currency()
    }

    /// The mandatory day rate.
    #[must_use]
    pub fn day_rate(&self) -> Money<'static, Currency> {
        self.day
    }

    /// Rate for one unit of the given granularity.
    ///
    /// An explicit rate wins; otherwise the rate derives from the day
    /// rate (hour = day/24 half-up, week = 7 x day, month = 30 x day).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AmountOutOfRange`] if a derived rate
    /// does not fit in minor units.
    pub fn rate_for(&self, unit: DurationUnit) -> Result<Money<'static, Currency>, ValidationError> {
        match unit {
            DurationUnit::Day => Ok(self.day),
            DurationUnit::Hour => match self.hour {
                Some(rate) => Ok(rate),
                None => self.derived_from_day(1, 24),
            },
            DurationUnit::Week => match self.week {
                Some(rate) => Ok(rate),
                None => self.derived_from_day(7, 1),
            },
            DurationUnit::Month => match self.month {
                Some(rate) => Ok(rate),
                None => self.derived_from_day(30, 1),
            },
        }
    }

    /// Scale the day rate by `numerator / denominator`, rounding half-up
    /// to whole minor units.
    fn derived_from_day(
        &self,
        numerator: i64,
        denominator: i64,
    ) -> Result<Money<'static, Currency>, ValidationError> {
        let scaled = Decimal::from(self.day.to_minor_units())
            .checked_mul(Decimal::from(numerator))
            .and_then(|value| value.checked_div(Decimal::from(denominator)))
            .ok_or(ValidationError::AmountOutOfRange)?;

        let minor = scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(ValidationError::AmountOutOfRange)?;

        Ok(Money::from_minor(minor, self.day.currency()))
    }

    fn check_extra_rate(&self, rate: &Money<'static, Currency>) -> Result<(), ValidationError> {
        ensure_non_negative(rate)?;

        if rate.currency() == self.day.currency() {
            Ok(())
        } else {
            Err(ValidationError::CurrencyMismatch {
                expected: self.day.currency().iso_alpha_code,
                found: rate.currency().iso_alpha_code,
            })
        }
    }
}

fn ensure_non_negative(rate: &Money<'static, Currency>) -> Result<(), ValidationError> {
    if rate.to_minor_units() < 0 {
        Err(ValidationError::NegativeRate)
    } else {
        Ok(())
    }
}
