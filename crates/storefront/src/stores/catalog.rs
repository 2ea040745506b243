//! Product catalog store.
//!
//! The catalog is the only writer of `Product::stock`. Cart and checkout
//! read stock through [`CatalogStore::get_by_id`] and request decrements
//! through [`CatalogStore::decrement_stock`] or
//! [`CatalogStore::commit_purchase`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use metamart_core::ProductId;

use super::seed::seed_catalog;
use crate::error::{Result, StockShortage, StoreError, ValidationError};
use crate::models::product::validate_product;
use crate::models::{Product, ProductDraft, ProductFilter};
use crate::storage::{Storage, StorageError, keys, read_json, write_json};

/// A quantity of one product to take out of stock, valid only while the
/// product's stock version still equals `expected_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReservation {
    pub product_id: ProductId,
    pub quantity: u32,
    pub expected_version: u64,
}

/// Store for the product catalog document.
pub struct CatalogStore {
    storage: Arc<dyn Storage>,
    products: Vec<Product>,
}

impl CatalogStore {
    /// Open the catalog, falling back to the seed catalog when the stored
    /// document is absent, malformed, or empty. The fallback is persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn open(storage: Arc<dyn Storage>) -> std::result::Result<Self, StorageError> {
        let (products, seeded) = Self::load(storage.as_ref())?;
        let store = Self { storage, products };
        if seeded {
            write_json(store.storage.as_ref(), keys::CATALOG, &store.products)?;
        }
        Ok(store)
    }

    /// Open the catalog with an explicit product list, replacing whatever
    /// was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn with_products(
        storage: Arc<dyn Storage>,
        products: Vec<Product>,
    ) -> std::result::Result<Self, StorageError> {
        write_json(storage.as_ref(), keys::CATALOG, &products)?;
        Ok(Self { storage, products })
    }

    fn load(storage: &dyn Storage) -> std::result::Result<(Vec<Product>, bool), StorageError> {
        match read_json::<Vec<Product>>(storage, keys::CATALOG) {
            Ok(Some(products)) if !products.is_empty() => Ok((products, false)),
            Ok(_) => {
                debug!("No saved catalog, using seed catalog");
                Ok((seed_catalog(), true))
            }
            Err(StorageError::Malformed { key, source }) => {
                warn!(key = %key, error = %source, "Failed to parse saved catalog, using seed catalog");
                Ok((seed_catalog(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Re-read the persisted catalog, picking up other sessions' writes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn reload(&mut self) -> std::result::Result<(), StorageError> {
        let (products, seeded) = Self::load(self.storage.as_ref())?;
        if seeded {
            write_json(self.storage.as_ref(), keys::CATALOG, &products)?;
        }
        self.products = products;
        Ok(())
    }

    /// Restore the seed catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn reset(&mut self) -> std::result::Result<(), StorageError> {
        self.commit(seed_catalog())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All products in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products matching every criterion of `filter`, in catalog order.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Products with `0 < stock <= threshold`, lowest stock first.
    #[must_use]
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.stock > 0 && p.stock <= threshold)
            .collect();
        low.sort_by_key(|p| p.stock);
        low
    }

    /// Products with no stock left.
    #[must_use]
    pub fn out_of_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.stock == 0).collect()
    }

    /// Distinct non-empty categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    // =========================================================================
    // Admin CRUD
    // =========================================================================

    /// Create a product from a draft, assigning a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a malformed draft, or
    /// `StoreError::Storage` if the write fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create(&mut self, draft: ProductDraft) -> Result<Product> {
        let product = draft.into_product(ProductId::generate())?;

        let mut next = self.products.clone();
        next.push(product.clone());
        self.commit(next)?;

        info!(product_id = %product.id, stock = product.stock, "Created product");
        Ok(product)
    }

    /// Replace the stored product with the same id.
    ///
    /// The stored stock version is kept, and bumped if the stock changed;
    /// the version on `product` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id,
    /// `StoreError::Validation` for malformed fields, or
    /// `StoreError::Storage` if the write fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn update(&mut self, product: Product) -> Result<Product> {
        let mut product = validate_product(product)?;

        let mut next = self.products.clone();
        let slot = next
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::product_not_found(&product.id))?;

        product.stock_version = if product.stock == slot.stock {
            slot.stock_version
        } else {
            slot.stock_version + 1
        };
        *slot = product.clone();
        self.commit(next)?;

        info!(stock = product.stock, "Updated product");
        Ok(product)
    }

    /// Remove a product. Removing an unknown id is a no-op.
    ///
    /// Returns whether a product was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the write fails.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &ProductId) -> Result<bool> {
        if self.get_by_id(id).is_none() {
            debug!("Product already absent");
            return Ok(false);
        }

        let next = self
            .products
            .iter()
            .filter(|p| &p.id != id)
            .cloned()
            .collect();
        self.commit(next)?;

        info!("Deleted product");
        Ok(true)
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Take `amount` units out of stock.
    ///
    /// Works on the persisted catalog, not this store's copy, so other
    /// sessions' stock changes are kept. Stock never goes negative: asking
    /// for more than is available is rejected, not clamped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id,
    /// `StoreError::StockConflict` if `amount` exceeds stock, or
    /// `StoreError::Storage` if the backend fails.
    #[instrument(skip(self))]
    pub fn decrement_stock(&mut self, id: &ProductId, amount: u32) -> Result<Product> {
        let (mut latest, _) = Self::load(self.storage.as_ref())?;
        match take_stock(&mut latest, id, amount) {
            Ok(updated) if amount > 0 => {
                self.commit(latest)?;
                debug!(stock = updated.stock, "Decremented stock");
                Ok(updated)
            }
            other => {
                self.products = latest;
                other
            }
        }
    }

    /// Commit a purchase: take every reservation out of stock, or none.
    ///
    /// The persisted catalog is re-read first; a reservation whose stock
    /// version no longer matches fails the whole commit with
    /// `ConcurrentModification`, and one exceeding stock fails it with
    /// `StockConflict`. Each product is written exactly once.
    ///
    /// # Errors
    ///
    /// Returns the conflict errors above, `StoreError::Validation` if a
    /// product appears twice, or `StoreError::Storage` if the backend fails.
    #[instrument(skip(self, reservations), fields(lines = reservations.len()))]
    pub fn commit_purchase(&mut self, reservations: &[StockReservation]) -> Result<()> {
        let mut seen = HashSet::new();
        if !reservations.iter().all(|r| seen.insert(&r.product_id)) {
            return Err(ValidationError::new("reservations", "a product appears more than once").into());
        }

        let (mut latest, _) = Self::load(self.storage.as_ref())?;

        let mut stale = Vec::new();
        let mut shortages = Vec::new();
        for reservation in reservations {
            match latest.iter().find(|p| p.id == reservation.product_id) {
                None => shortages.push(StockShortage {
                    product_id: reservation.product_id.clone(),
                    name: self
                        .get_by_id(&reservation.product_id)
                        .map_or_else(|| reservation.product_id.to_string(), |p| p.name.clone()),
                    requested: reservation.quantity,
                    available: 0,
                }),
                Some(p) if p.stock_version != reservation.expected_version => {
                    stale.push(p.id.clone());
                }
                Some(p) if p.stock < reservation.quantity => shortages.push(StockShortage {
                    product_id: p.id.clone(),
                    name: p.name.clone(),
                    requested: reservation.quantity,
                    available: p.stock,
                }),
                Some(_) => {}
            }
        }

        if !stale.is_empty() || !shortages.is_empty() {
            // Nothing was written; adopt the persisted view so a retry sees it.
            self.products = latest;
            if stale.is_empty() {
                warn!(?shortages, "Purchase rejected: insufficient stock");
                return Err(StoreError::StockConflict(shortages));
            }
            warn!(?stale, "Purchase rejected: stock changed in another session");
            return Err(StoreError::ConcurrentModification(stale));
        }

        for reservation in reservations {
            if let Some(p) = latest.iter_mut().find(|p| p.id == reservation.product_id) {
                p.stock -= reservation.quantity;
                p.sales = p.sales.saturating_add(reservation.quantity);
                p.stock_version += 1;
            }
        }
        self.commit(latest)?;

        info!("Committed purchase stock");
        Ok(())
    }

    /// Put reserved units back, undoing a committed purchase whose order
    /// could not be recorded. Applied to the persisted catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the backend fails.
    #[instrument(skip(self, reservations), fields(lines = reservations.len()))]
    pub fn restock(&mut self, reservations: &[StockReservation]) -> Result<()> {
        let (mut next, _) = Self::load(self.storage.as_ref())?;
        for reservation in reservations {
            if let Some(p) = next.iter_mut().find(|p| p.id == reservation.product_id) {
                p.stock = p.stock.saturating_add(reservation.quantity);
                p.sales = p.sales.saturating_sub(reservation.quantity);
                p.stock_version += 1;
            }
        }
        self.commit(next)?;
        warn!("Restocked reserved units");
        Ok(())
    }

    fn commit(&mut self, next: Vec<Product>) -> std::result::Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::CATALOG, &next)?;
        self.products = next;
        Ok(())
    }
}

/// Take `amount` units of `id` out of `products`, bumping its stock version.
fn take_stock(products: &mut [Product], id: &ProductId, amount: u32) -> Result<Product> {
    let product = products
        .iter_mut()
        .find(|p| &p.id == id)
        .ok_or_else(|| StoreError::product_not_found(id))?;

    if amount > product.stock {
        return Err(StoreError::StockConflict(vec![StockShortage {
            product_id: id.clone(),
            name: product.name.clone(),
            requested: amount,
            available: product.stock,
        }]));
    }
    if amount > 0 {
        product.stock -= amount;
        product.stock_version += 1;
    }
    Ok(product.clone())
}
