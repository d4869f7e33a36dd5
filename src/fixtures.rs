//! Fixtures
//!
//! YAML-described marketplace catalogs for integration tests and
//! demos. A fixture set is one file under the base path holding a
//! currency, a product map and a rental list; loading builds a fully
//! wired [`Engine`] over a [`MemoryStore`], driving every record
//! through the ordinary engine operations.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    categories::Category,
    engine::{Engine, RentalRequest},
    errors::EngineError,
    products::{Product, ProductKey, ProductStatus, UserKey},
    rates::{DurationUnit, RateCard},
    rentals::{RentalKey, RentalStatus},
    store::MemoryStore,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A rental status fixtures cannot drive without a clock
    #[error("Unsupported rental status in fixture: {0}")]
    UnsupportedRentalStatus(RentalStatus),

    /// Error bubbled up from the engine while wiring records
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    currency: String,

    #[serde(default)]
    products: FxHashMap<String, ProductFixture>,

    #[serde(default)]
    rentals: Vec<RentalFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    title: String,
    category: Category,
    owner: String,
    rates: RatesFixture,

    #[serde(default)]
    security_deposit: Option<String>,

    #[serde(default)]
    status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize)]
struct RatesFixture {
    day: String,

    #[serde(default)]
    hour: Option<String>,

    #[serde(default)]
    week: Option<String>,

    #[serde(default)]
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RentalFixture {
    product: String,
    renter: String,
    start: Timestamp,
    end: Timestamp,
    duration: i64,
    unit: DurationUnit,

    #[serde(default)]
    status: Option<RentalStatus>,

    #[serde(default)]
    notes: Option<String>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Engine wired over an in-memory store
    engine: Engine<MemoryStore>,

    /// Users mentioned by fixtures, keyed on first sight
    users: SlotMap<UserKey, String>,

    /// String key -> key mappings for lookups
    user_keys: FxHashMap<String, UserKey>,
    product_keys: FxHashMap<String, ProductKey>,

    /// Rentals in file order
    rental_keys: Vec<RentalKey>,
}

impl Fixture {
    /// Create a new empty fixture with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Fixture {
            base_path: base_path.into(),
            engine: Engine::new(MemoryStore::new()),
            users: SlotMap::with_key(),
            user_keys: FxHashMap::default(),
            product_keys: FxHashMap::default(),
            rental_keys: Vec::new(),
        }
    }

    /// Load a complete fixture set from `<base>/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// record is rejected by the engine while wiring.
    pub fn load(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let file: FixtureFile = serde_norway::from_str(&contents)?;

        let currency = iso::find(&file.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(file.currency.clone()))?;

        for (key, product_fixture) in file.products {
            let product_key = self.build_product(currency, &product_fixture)?;
            self.product_keys.insert(key, product_key);
        }

        for rental_fixture in file.rentals {
            let rental_key = self.build_rental(&rental_fixture)?;
            self.rental_keys.push(rental_key);
        }

        Ok(self)
    }

    /// Load a named fixture set from the default base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();
        fixture.load(name)?;

        Ok(fixture)
    }

    /// The wired engine.
    #[must_use]
    pub fn engine(&self) -> &Engine<MemoryStore> {
        &self.engine
    }

    /// The wired engine, mutably.
    pub fn engine_mut(&mut self) -> &mut Engine<MemoryStore> {
        &mut self.engine
    }

    /// Get a product key by its string key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a user key by name, creating the user on first sight.
    pub fn user_key(&mut self, name: &str) -> UserKey {
        if let Some(&key) = self.user_keys.get(name) {
            return key;
        }

        let key = self.users.insert(name.to_string());
        self.user_keys.insert(name.to_string(), key);

        key
    }

    /// Rental keys in file order.
    #[must_use]
    pub fn rental_keys(&self) -> &[RentalKey] {
        &self.rental_keys
    }

    /// Display name of a fixture user.
    #[must_use]
    pub fn user_name(&self, key: UserKey) -> Option<&str> {
        self.users.get(key).map(String::as_str)
    }

    fn build_product(
        &mut self,
        currency: &'static Currency,
        fixture: &ProductFixture,
    ) -> Result<ProductKey, FixtureError> {
        let mut rates = RateCard::new(parse_price(&fixture.rates.day, currency)?)
            .map_err(EngineError::from)?;

        if let Some(hour) = &fixture.rates.hour {
            rates = rates
                .with_hour(parse_price(hour, currency)?)
                .map_err(EngineError::from)?;
        }

        if let Some(week) = &fixture.rates.week {
            rates = rates
                .with_week(parse_price(week, currency)?)
                .map_err(EngineError::from)?;
        }

        if let Some(month) = &fixture.rates.month {
            rates = rates
                .with_month(parse_price(month, currency)?)
                .map_err(EngineError::from)?;
        }

        let owner = self.user_key(&fixture.owner);
        let mut product = Product::new(fixture.title.clone(), fixture.category, rates, owner);

        if let Some(deposit) = &fixture.security_deposit {
            product = product
                .with_security_deposit(parse_price(deposit, currency)?)
                .map_err(EngineError::from)?;
        }

        let key = self.engine.add_product(product);

        if let Some(status) = fixture.status {
            drive_product_status(&mut self.engine, key, status)?;
        }

        Ok(key)
    }

    fn build_rental(&mut self, fixture: &RentalFixture) -> Result<RentalKey, FixtureError> {
        let product = self.product_key(&fixture.product)?;
        let renter = self.user_key(&fixture.renter);

        let key = self.engine.request_rental(RentalRequest {
            product,
            renter,
            start: fixture.start,
            end: fixture.end,
            duration: fixture.duration,
            unit: fixture.unit,
            notes: fixture.notes.clone(),
        })?;

        match fixture.status {
            None | Some(RentalStatus::Pending) => {}
            Some(RentalStatus::Accepted) => self.engine.accept_rental(key)?,
            Some(RentalStatus::Rejected) => self.engine.reject_rental(key)?,
            // The remaining statuses need a clock instant; tests drive
            // them through the engine with an explicit `now`.
            Some(status) => return Err(FixtureError::UnsupportedRentalStatus(status)),
        }

        Ok(key)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a freshly added draft product to its target status via the
/// lifecycle tables.
fn drive_product_status(
    engine: &mut Engine<MemoryStore>,
    key: ProductKey,
    target: ProductStatus,
) -> Result<(), EngineError> {
    match target {
        ProductStatus::Draft => Ok(()),
        ProductStatus::PendingReview => engine.submit_for_review(key),
        ProductStatus::Active => {
            engine.submit_for_review(key)?;
            engine.update_product_status(key, ProductStatus::Active, None)
        }
        ProductStatus::Rejected => {
            engine.submit_for_review(key)?;
            engine.update_product_status(key, ProductStatus::Rejected, None)
        }
        ProductStatus::Inactive => {
            engine.submit_for_review(key)?;
            engine.update_product_status(key, ProductStatus::Active, None)?;
            engine.update_product_status(key, ProductStatus::Inactive, None)
        }
    }
}

/// Parse a plain decimal amount like `"1500.00"` into minor units of
/// the fixture currency.
fn parse_price(
    raw: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, FixtureError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_parse_err| FixtureError::InvalidPrice(raw.to_string()))?;

    let scale = Decimal::from(10i64.pow(currency.exponent));

    let scaled = amount
        .checked_mul(scale)
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(FixtureError::InvalidPrice(raw.to_string()));
    }

    let minor = scaled
        .to_i64()
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}
