//! Store
//!
//! The persistence collaborator seam. The engine only ever talks to a
//! [`RentalStore`]; real deployments back it with a database, tests and
//! embedders use [`MemoryStore`].
//!
//! Atomicity contract: implementations must execute "check availability
//! then insert a pending rental" and "re-check then accept" as a single
//! isolated unit per product (a serializable transaction or a
//! per-product lock). Rentals of different products never contend.
//! [`MemoryStore`] satisfies this trivially through `&mut self`
//! exclusivity.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::{
    errors::NotFoundError,
    products::{Product, ProductKey},
    rentals::{Rental, RentalKey},
};

/// Inline list of blocking intervals, ordered by start time.
pub type BlockingIntervals = SmallVec<[(Timestamp, Timestamp); 8]>;

/// Accessor contract the engine requires from its persistence layer.
pub trait RentalStore {
    /// Fetch a product.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the key resolves to nothing.
    fn product(&self, key: ProductKey) -> Result<&Product, NotFoundError>;

    /// Fetch a product mutably.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the key resolves to nothing.
    fn product_mut(&mut self, key: ProductKey) -> Result<&mut Product, NotFoundError>;

    /// Fetch a rental.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Rental`] if the key resolves to nothing.
    fn rental(&self, key: RentalKey) -> Result<&Rental, NotFoundError>;

    /// Fetch a rental mutably.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Rental`] if the key resolves to nothing.
    fn rental_mut(&mut self, key: RentalKey) -> Result<&mut Rental, NotFoundError>;

    /// Store a new product, returning its key.
    fn insert_product(&mut self, product: Product) -> ProductKey;

    /// Store a new rental against its product.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the rental references a
    /// product the store does not hold.
    fn insert_rental(&mut self, rental: Rental) -> Result<RentalKey, NotFoundError>;

    /// Remove a product and cascade to its rentals.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the key resolves to nothing.
    fn remove_product(&mut self, key: ProductKey) -> Result<(), NotFoundError>;

    /// Transactionally consistent snapshot of the product's blocking
    /// rental intervals, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the key resolves to nothing.
    fn blocking_intervals(&self, product: ProductKey) -> Result<BlockingIntervals, NotFoundError>;

    /// Like [`RentalStore::blocking_intervals`], excluding one rental.
    ///
    /// Used when accepting: the rental being accepted must not conflict
    /// with itself.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Product`] if the key resolves to nothing.
    fn blocking_intervals_except(
        &self,
        product: ProductKey,
        except: RentalKey,
    ) -> Result<BlockingIntervals, NotFoundError>;
}

/// In-memory [`RentalStore`] backed by slot maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: SlotMap<ProductKey, Product>,
    rentals: SlotMap<RentalKey, Rental>,
    by_product: FxHashMap<ProductKey, Vec<RentalKey>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of products held.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of rentals held.
    #[must_use]
    pub fn rental_count(&self) -> usize {
        self.rentals.len()
    }

    fn collect_blocking(
        &self,
        product: ProductKey,
        skip: Option<RentalKey>,
    ) -> Result<BlockingIntervals, NotFoundError> {
        if !self.products.contains_key(product) {
            return Err(NotFoundError::Product(product));
        }

        let mut intervals: BlockingIntervals = self
            .by_product
            .get(&product)
            .into_iter()
            .flatten()
            .filter(|&&key| Some(key) != skip)
            .filter_map(|&key| self.rentals.get(key))
            .filter(|rental| rental.status().is_blocking())
            .map(Rental::interval)
            .collect();

        intervals.sort_unstable_by_key(|&(start, _)| start);

        Ok(intervals)
    }
}

impl RentalStore for MemoryStore {
    fn product(&self, key: ProductKey) -> Result<&Product, NotFoundError> {
        self.products.get(key).ok_or(NotFoundError::Product(key))
    }

    fn product_mut(&mut self, key: ProductKey) -> Result<&mut Product, NotFoundError> {
        self.products
            .get_mut(key)
            .ok_or(NotFoundError::Product(key))
    }

    fn rental(&self, key: RentalKey) -> Result<&Rental, NotFoundError> {
        self.rentals.get(key).ok_or(NotFoundError::Rental(key))
    }

    fn rental_mut(&mut self, key: RentalKey) -> Result<&mut Rental, NotFoundError> {
        self.rentals.get_mut(key).ok_or(NotFoundError::Rental(key))
    }

    fn insert_product(&mut self, product: Product) -> ProductKey {
        self.products.insert(product)
    }

    fn insert_rental(&mut self, rental: Rental) -> Result<RentalKey, NotFoundError> {
        let product = rental.product();

        if !self.products.contains_key(product) {
            return Err(NotFoundError::Product(product));
        }

        let key = self.rentals.insert(rental);
        self.by_product.entry(product).or_default().push(key);

        Ok(key)
    }

    fn remove_product(&mut self, key: ProductKey) -> Result<(), NotFoundError> {
        self.products
            .remove(key)
            .ok_or(NotFoundError::Product(key))?;

        for rental_key in self.by_product.remove(&key).unwrap_or_default() {
            self.rentals.remove(rental_key);
        }

        Ok(())
    }

    fn blocking_intervals(&self, product: ProductKey) -> Result<BlockingIntervals, NotFoundError> {
        self.collect_blocking(product, None)
    }

    fn blocking_intervals_except(
        &self,
        product: ProductKey,
        except: RentalKey,
    ) -> Result<BlockingIntervals, NotFoundError> {
        self.collect_blocking(product, Some(except))
    }
}
