//! Bailment prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    availability::{intervals_overlap, is_date_available, is_range_available},
    categories::{Category, CategoryGroup},
    engine::{Engine, RentalRequest},
    errors::{
        EngineError, InvalidRangeError, InvalidTransitionError, NotFoundError, ValidationError,
    },
    fixtures::{Fixture, FixtureError},
    pricing::calculate_price,
    products::{Product, ProductKey, ProductStatus, UserKey},
    quote::Quote,
    rates::{DurationUnit, RateCard},
    rentals::{Rental, RentalKey, RentalStatus},
    store::{BlockingIntervals, MemoryStore, RentalStore},
};
