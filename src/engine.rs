//! Engine
//!
//! Facade over a [`RentalStore`]: resolves keys, enforces not-found
//! semantics, and routes every status change through the
//! [`crate::lifecycle`] tables. All clock instants are explicit
//! parameters; the engine never reads ambient time.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, info, warn};

use crate::{
    availability,
    errors::{EngineError, ValidationError},
    lifecycle, pricing,
    products::{Product, ProductKey, ProductStatus, UserKey},
    quote::Quote,
    rates::DurationUnit,
    rentals::{Rental, RentalKey},
    store::RentalStore,
};

/// A renter's booking request, priced and checked by
/// [`Engine::request_rental`].
#[derive(Debug, Clone)]
pub struct RentalRequest {
    /// Listing to book.
    pub product: ProductKey,

    /// Requesting user.
    pub renter: UserKey,

    /// Start of the requested interval.
    pub start: Timestamp,

    /// End of the requested interval (exclusive).
    pub end: Timestamp,

    /// Rental length in `unit`s, used for pricing.
    pub duration: i64,

    /// Pricing granularity.
    pub unit: DurationUnit,

    /// Free-text notes for the owner.
    pub notes: Option<String>,
}

/// Marketplace engine over a persistence collaborator.
///
/// The store's atomicity contract (see [`crate::store`]) makes the
/// check-then-insert and recheck-then-accept paths race-free per
/// product; the engine adds no locking of its own.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
}

impl<S: RentalStore> Engine<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Engine { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    ///
    /// Record fields stay private, so status changes still have to go
    /// through the lifecycle functions.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the engine, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Store a new listing.
    pub fn add_product(&mut self, product: Product) -> ProductKey {
        let key = self.store.insert_product(product);
        debug!(?key, "product added");

        key
    }

    /// Fetch a listing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the key resolves to nothing.
    pub fn product(&self, key: ProductKey) -> Result<&Product, EngineError> {
        Ok(self.store.product(key)?)
    }

    /// Fetch a rental.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the key resolves to nothing.
    pub fn rental(&self, key: RentalKey) -> Result<&Rental, EngineError> {
        Ok(self.store.rental(key)?)
    }

    /// Whether `[start, end)` is free for the product.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::InvalidRange`] if `end` is not after `start`.
    pub fn is_range_available(
        &self,
        product: ProductKey,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<bool, EngineError> {
        let blocking = self.store.blocking_intervals(product)?;

        Ok(availability::is_range_available(&blocking, start, end)?)
    }

    /// Whether the single instant `date` is free for the product.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the product is absent.
    pub fn is_date_available(
        &self,
        product: ProductKey,
        date: Timestamp,
    ) -> Result<bool, EngineError> {
        let blocking = self.store.blocking_intervals(product)?;

        Ok(availability::is_date_available(&blocking, date))
    }

    /// Total price for renting the product for `duration` units.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::Validation`] for a non-positive duration or an
    ///   amount overflow.
    pub fn calculate_price(
        &self,
        product: ProductKey,
        duration: i64,
        unit: DurationUnit,
    ) -> Result<Money<'static, Currency>, EngineError> {
        let product = self.store.product(product)?;

        Ok(pricing::calculate_price(product, duration, unit)?)
    }

    /// Priced quote breakdown for a prospective rental.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Engine::calculate_price`].
    pub fn quote(
        &self,
        product: ProductKey,
        duration: i64,
        unit: DurationUnit,
    ) -> Result<Quote, EngineError> {
        let product = self.store.product(product)?;

        Ok(Quote::new(product, duration, unit)?)
    }

    /// Price, validate and store a new `Pending` rental.
    ///
    /// Runs inside the store's per-product atomic unit: the
    /// availability check and the insert are never interleaved with
    /// another booking for the same product.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::InvalidRange`] if `end` is not after `start`.
    /// - [`EngineError::Validation`] if the range is taken, the renter
    ///   owns the listing, or the pricing inputs are invalid.
    pub fn request_rental(&mut self, request: RentalRequest) -> Result<RentalKey, EngineError> {
        let product = self.store.product(request.product)?;
        let owner = product.owner();
        let deposit = product.security_deposit();
        let price = pricing::calculate_price(product, request.duration, request.unit)?;

        let blocking = self.store.blocking_intervals(request.product)?;

        if !availability::is_range_available(&blocking, request.start, request.end)? {
            warn!(
                product = ?request.product,
                start = %request.start,
                end = %request.end,
                "rental request conflicts with a blocking rental"
            );

            return Err(ValidationError::RangeUnavailable {
                start: request.start,
                end: request.end,
            }
            .into());
        }

        let mut rental = Rental::new(
            request.product,
            owner,
            request.renter,
            request.start,
            request.end,
            price,
            deposit,
        )?;

        if let Some(notes) = request.notes {
            rental = rental.with_notes(notes);
        }

        let key = self.store.insert_rental(rental)?;
        info!(?key, product = ?request.product, %price, "rental requested");

        Ok(key)
    }

    /// Submit a drafted listing for review.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::InvalidTransition`] if it is not in `Draft`.
    pub fn submit_for_review(&mut self, key: ProductKey) -> Result<(), EngineError> {
        let product = self.store.product_mut(key)?;
        lifecycle::submit_for_review(product)?;
        info!(?key, "product submitted for review");

        Ok(())
    }

    /// Admin decision or owner (de)activation on a listing.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::InvalidTransition`] if the edge is not in the
    ///   product transition table.
    pub fn update_product_status(
        &mut self,
        key: ProductKey,
        requested: ProductStatus,
        message: Option<&str>,
    ) -> Result<(), EngineError> {
        let product = self.store.product_mut(key)?;
        let previous = product.status();
        lifecycle::update_product_status(product, requested, message)?;
        info!(?key, %previous, %requested, "product status updated");

        Ok(())
    }

    /// Owner accepts a pending rental, re-checking availability against
    /// the product's other blocking rentals inside the same atomic unit.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the rental is absent.
    /// - [`EngineError::InvalidTransition`] if it is not `Pending`.
    /// - [`EngineError::Validation`] if the range was taken meanwhile.
    pub fn accept_rental(&mut self, key: RentalKey) -> Result<(), EngineError> {
        let product = self.store.rental(key)?.product();
        let others = self.store.blocking_intervals_except(product, key)?;

        let rental = self.store.rental_mut(key)?;
        lifecycle::accept_rental(rental, &others)?;
        info!(?key, ?product, "rental accepted");

        Ok(())
    }

    /// Owner rejects a pending rental.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the rental is absent.
    /// - [`EngineError::InvalidTransition`] if it is not `Pending`.
    pub fn reject_rental(&mut self, key: RentalKey) -> Result<(), EngineError> {
        let rental = self.store.rental_mut(key)?;
        lifecycle::reject_rental(rental)?;
        info!(?key, "rental rejected");

        Ok(())
    }

    /// Either party cancels a rental before its start time.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the rental is absent.
    /// - [`EngineError::InvalidTransition`] if it is neither `Pending`
    ///   nor `Accepted`, or `now` is at/after the start time.
    pub fn cancel_rental(&mut self, key: RentalKey, now: Timestamp) -> Result<(), EngineError> {
        let rental = self.store.rental_mut(key)?;
        lifecycle::cancel_rental(rental, now)?;
        info!(?key, %now, "rental cancelled");

        Ok(())
    }

    /// Mark an accepted rental as running.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the rental is absent.
    /// - [`EngineError::InvalidTransition`] if it is not `Accepted` or
    ///   the start time has not been reached.
    pub fn start_rental(&mut self, key: RentalKey, now: Timestamp) -> Result<(), EngineError> {
        let rental = self.store.rental_mut(key)?;
        lifecycle::start_rental(rental, now)?;
        info!(?key, %now, "rental started");

        Ok(())
    }

    /// Mark a running rental as completed.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the rental is absent.
    /// - [`EngineError::InvalidTransition`] if it is not `InProgress`
    ///   or the end time has not been reached.
    pub fn complete_rental(&mut self, key: RentalKey, now: Timestamp) -> Result<(), EngineError> {
        let rental = self.store.rental_mut(key)?;
        lifecycle::complete_rental(rental, now)?;
        info!(?key, %now, "rental completed");

        Ok(())
    }

    /// Bump a listing's view counter, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the product is absent.
    pub fn increment_views(&mut self, key: ProductKey) -> Result<u64, EngineError> {
        let product = self.store.product_mut(key)?;

        Ok(product.increment_views())
    }

    /// Record an externally recomputed average rating.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::Validation`] for ratings outside `0..=5`.
    pub fn update_average_rating(
        &mut self,
        key: ProductKey,
        rating: Decimal,
    ) -> Result<(), EngineError> {
        let product = self.store.product_mut(key)?;
        product.update_average_rating(rating)?;
        debug!(?key, %rating, "average rating updated");

        Ok(())
    }

    /// Owner-only removal of a listing; the store cascades to its
    /// rentals.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the product is absent.
    /// - [`EngineError::Validation`] if `actor` is not the owner.
    pub fn remove_product(&mut self, key: ProductKey, actor: UserKey) -> Result<(), EngineError> {
        let product = self.store.product(key)?;

        if product.owner() != actor {
            warn!(?key, ?actor, "non-owner attempted to remove a product");

            return Err(ValidationError::NotOwner.into());
        }

        self.store.remove_product(key)?;
        info!(?key, "product removed");

        Ok(())
    }
}
