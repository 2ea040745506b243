//! Wishlist store.

use std::sync::Arc;

use tracing::{debug, instrument};

use metamart_core::ProductId;

use super::load_or_default;
use crate::models::Product;
use crate::storage::{Storage, StorageError, keys, write_json};

/// Store for the wishlist document: product snapshots keyed by id.
pub struct WishlistStore {
    storage: Arc<dyn Storage>,
    items: Vec<Product>,
}

impl WishlistStore {
    /// Open the wishlist. A malformed document loads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        let mut items: Vec<Product> = load_or_default(storage.as_ref(), keys::WISHLIST)?;
        let mut seen = std::collections::HashSet::new();
        items.retain(|p| seen.insert(p.id.clone()));
        Ok(Self { storage, items })
    }

    /// Add `product` if absent, remove it if present.
    ///
    /// Returns whether the product is listed afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails; the wishlist is unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn toggle(&mut self, product: &Product) -> Result<bool, StorageError> {
        let listed = self.contains(&product.id);
        let next = if listed {
            self.items
                .iter()
                .filter(|p| p.id != product.id)
                .cloned()
                .collect()
        } else {
            let mut next = self.items.clone();
            next.push(product.clone());
            next
        };
        self.commit(next)?;
        debug!(listed = !listed, "Toggled wishlist entry");
        Ok(!listed)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }

    /// Listed product snapshots, oldest first.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::WISHLIST, &next)?;
        self.items = next;
        Ok(())
    }
}
