//! Quote
//!
//! A priced breakdown for a prospective rental: line total from the
//! rate card, the deposit snapshot that would be taken, and the grand
//! total. Collaborator layers show this to a renter before they commit
//! to a booking.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{errors::ValidationError, pricing, products::Product, rates::DurationUnit};

/// Priced quote for renting a listing over a number of duration units.
#[derive(Debug, Clone)]
pub struct Quote {
    product_title: String,
    duration: i64,
    unit: DurationUnit,
    unit_rate: Money<'static, Currency>,
    line_total: Money<'static, Currency>,
    security_deposit: Option<Money<'static, Currency>>,
    grand_total: Money<'static, Currency>,
}

impl Quote {
    /// Price a prospective rental of `duration` units of `unit`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a non-positive duration, an
    /// amount overflow, or a money arithmetic failure.
    pub fn new(
        product: &Product,
        duration: i64,
        unit: DurationUnit,
    ) -> Result<Self, ValidationError> {
        let line_total = pricing::calculate_price(product, duration, unit)?;
        let unit_rate = product.rates().rate_for(unit)?;
        let security_deposit = product.security_deposit();

        let grand_total = match security_deposit {
            Some(deposit) => line_total.add(deposit)?,
            None => line_total,
        };

        Ok(Quote {
            product_title: product.title().to_string(),
            duration,
            unit,
            unit_rate,
            line_total,
            security_deposit,
            grand_total,
        })
    }

    /// Title of the quoted listing.
    #[must_use]
    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    /// Number of duration units quoted.
    #[must_use]
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Pricing granularity of the quote.
    #[must_use]
    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// Rate per single unit, explicit or derived.
    #[must_use]
    pub fn unit_rate(&self) -> Money<'static, Currency> {
        self.unit_rate
    }

    /// Rate times duration.
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        self.line_total
    }

    /// Deposit that would be snapshotted onto the rental, if any.
    #[must_use]
    pub fn security_deposit(&self) -> Option<Money<'static, Currency>> {
        self.security_deposit
    }

    /// Line total plus deposit.
    #[must_use]
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }

    /// Render the quote as a breakdown table.
    #[must_use]
    pub fn render(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Duration", "Rate", "Amount"]);

        let plural = if self.duration == 1 { "" } else { "s" };

        builder.push_record([
            self.product_title.clone(),
            format!("{} {}{plural}", self.duration, self.unit),
            format!("{}", self.unit_rate),
            format!("{}", self.line_total),
        ]);

        if let Some(deposit) = self.security_deposit {
            builder.push_record([
                "Security deposit".to_string(),
                String::new(),
                String::new(),
                format!("{deposit}"),
            ]);
        }

        builder.push_record([
            "Total".to_string(),
            String::new(),
            String::new(),
            format!("{}", self.grand_total),
        ]);

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..4), Alignment::right());

        table.to_string()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use testresult::TestResult;

    use crate::{categories::Category, products::UserKey, rates::RateCard};

    use super::*;

    fn camera_with_deposit() -> TestResult<Product> {
        let rates = RateCard::new(Money::from_minor(2000, BDT))?;

        Ok(
            Product::new("Canon EOS 90D", Category::Camera, rates, UserKey::default())
                .with_security_deposit(Money::from_minor(5000, BDT))?,
        )
    }

    #[test]
    fn grand_total_is_line_total_plus_deposit() -> TestResult {
        let product = camera_with_deposit()?;

        let quote = Quote::new(&product, 4, DurationUnit::Day)?;

        assert_eq!(quote.line_total(), Money::from_minor(8000, BDT));
        assert_eq!(quote.security_deposit(), Some(Money::from_minor(5000, BDT)));
        assert_eq!(quote.grand_total(), Money::from_minor(13_000, BDT));

        Ok(())
    }

    #[test]
    fn grand_total_without_deposit_is_the_line_total() -> TestResult {
        let rates = RateCard::new(Money::from_minor(2000, BDT))?;
        let product = Product::new("Ladder", Category::Ladder, rates, UserKey::default());

        let quote = Quote::new(&product, 3, DurationUnit::Day)?;

        assert_eq!(quote.grand_total(), quote.line_total());

        Ok(())
    }

    #[test]
    fn invalid_duration_propagates() -> TestResult {
        let product = camera_with_deposit()?;

        let err = Quote::new(&product, 0, DurationUnit::Day).err();

        assert!(matches!(err, Some(ValidationError::NonPositiveDuration(0))));

        Ok(())
    }

    #[test]
    fn render_includes_the_breakdown_rows() -> TestResult {
        let product = camera_with_deposit()?;

        let quote = Quote::new(&product, 4, DurationUnit::Day)?;
        let rendered = quote.render();

        assert!(rendered.contains("Canon EOS 90D"), "title row expected");
        assert!(rendered.contains("4 days"), "duration cell expected");
        assert!(rendered.contains("Security deposit"), "deposit row expected");
        assert!(rendered.contains("Total"), "total row expected");

        Ok(())
    }
}
