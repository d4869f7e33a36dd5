//! Engine errors
//!
//! Four caller-recoverable error kinds, one per failure family, plus
//! [`EngineError`] which composes them at the engine facade. Collaborator
//! layers are expected to map these onto their own transport responses.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::MoneyError;
use thiserror::Error;

use crate::{
    products::{ProductKey, ProductStatus},
    rentals::{RentalKey, RentalStatus},
};

/// A candidate rental range whose end does not come strictly after its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid range: end {end} is not strictly after start {start}")]
pub struct InvalidRangeError {
    /// Requested range start.
    pub start: Timestamp,

    /// Requested range end.
    pub end: Timestamp,
}

/// A request that fails input validation before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Rental duration must be a positive integer.
    #[error("duration must be a positive integer, got {0}")]
    NonPositiveDuration(i64),

    /// The duration unit string is not one of hour/day/week/month.
    #[error("unknown duration unit {0:?}")]
    UnknownUnit(String),

    /// The category code is not part of the taxonomy.
    #[error("unknown category code {0:?}")]
    UnknownCategory(String),

    /// An average rating outside the 0..=5 range.
    #[error("rating {0} is outside the 0..=5 range")]
    RatingOutOfRange(Decimal),

    /// A rate card entry below zero.
    #[error("rental rates must not be negative")]
    NegativeRate,

    /// A security deposit below zero.
    #[error("security deposit must not be negative")]
    NegativeDeposit,

    /// A monetary value in a different currency than the listing's rates.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// ISO code the listing's rate card uses.
        expected: &'static str,

        /// ISO code of the offending value.
        found: &'static str,
    },

    /// A renter attempting to book their own listing.
    #[error("renter and owner must be different users")]
    RenterIsOwner,

    /// An actor other than the owner attempting an owner-only operation.
    #[error("only the listing owner may perform this operation")]
    NotOwner,

    /// The requested range overlaps a blocking rental.
    #[error("range [{start}, {end}) overlaps an existing blocking rental")]
    RangeUnavailable {
        /// Requested range start.
        start: Timestamp,

        /// Requested range end.
        end: Timestamp,
    },

    /// A derived or multiplied amount that no longer fits in minor units.
    #[error("amount does not fit in minor currency units")]
    AmountOutOfRange,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A status change outside the legal transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransitionError {
    /// Illegal product status change.
    #[error("product cannot move from {current} to {requested}")]
    Product {
        /// Status the product currently holds.
        current: ProductStatus,

        /// Status that was requested.
        requested: ProductStatus,
    },

    /// Illegal rental status change.
    #[error("rental cannot move from {current} to {requested}")]
    Rental {
        /// Status the rental currently holds.
        current: RentalStatus,

        /// Status that was requested.
        requested: RentalStatus,
    },

    /// Cancellation requested at or after the rental start time.
    #[error("rental starting at {start} can no longer be cancelled at {now}")]
    CancelAfterStart {
        /// Rental start time.
        start: Timestamp,

        /// Instant the cancellation was requested.
        now: Timestamp,
    },

    /// Start requested before the rental start time was reached.
    #[error("rental start time {start} has not been reached at {now}")]
    StartTimeNotReached {
        /// Rental start time.
        start: Timestamp,

        /// Instant the start was requested.
        now: Timestamp,
    },

    /// Completion requested before the rental end time was reached.
    #[error("rental end time {end} has not been reached at {now}")]
    EndTimeNotReached {
        /// Rental end time.
        end: Timestamp,

        /// Instant the completion was requested.
        now: Timestamp,
    },
}

/// A referenced record that the store does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// The product key resolves to nothing.
    #[error("product {0:?} not found")]
    Product(ProductKey),

    /// The rental key resolves to nothing.
    #[error("rental {0:?} not found")]
    Rental(RentalKey),
}

/// Any failure the engine facade can surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Start/end ordering violated.
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    /// Request failed input validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Illegal status change.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),

    /// Referenced record absent.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
