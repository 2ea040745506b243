//! Shopping cart store.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use metamart_core::{Price, ProductId};

use super::{CatalogStore, OrderStore, load_or_default};
use crate::error::{Result, StockShortage, StoreError, ValidationError};
use crate::models::{CartLine, CustomerInfo, Order, User};
use crate::services::checkout;
use crate::storage::{Storage, StorageError, keys, write_json};

/// Store for the shopping cart document.
///
/// At most one line per product, every quantity at least 1. Quantities are
/// checked against live catalog stock on every change; the snapshot on a
/// line is display data only.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Open the cart. A malformed document loads as an empty cart.
    ///
    /// Zero-quantity lines are dropped and repeated lines for one product
    /// are merged into the first, summing quantities.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn open(storage: Arc<dyn Storage>) -> std::result::Result<Self, StorageError> {
        let stored: Vec<CartLine> = load_or_default(storage.as_ref(), keys::CART)?;
        let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
        for line in stored.into_iter().filter(|l| l.quantity > 0) {
            match lines.iter_mut().find(|l| l.product_id() == line.product_id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        Ok(Self { storage, lines })
    }

    /// Cart lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == id)
    }

    /// Quantity of a product in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map_or(0, |l| l.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of line totals at snapshot prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a zero quantity,
    /// `StoreError::NotFound` for an unknown product,
    /// `StoreError::StockConflict` if the resulting quantity exceeds stock,
    /// or `StoreError::Storage` if the write fails.
    #[instrument(skip(self, catalog))]
    pub fn add_item(
        &mut self,
        catalog: &CatalogStore,
        id: &ProductId,
        quantity: u32,
    ) -> Result<CartLine> {
        if quantity == 0 {
            return Err(ValidationError::new("quantity", "must be at least 1").into());
        }
        let wanted = self.quantity_of(id).saturating_add(quantity);
        self.put(catalog, id, wanted)
    }

    /// Set a product's quantity, adding the line if absent. Zero removes
    /// the line and always succeeds.
    ///
    /// Returns the updated line, or `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product is not in the catalog,
    /// `StoreError::StockConflict` if `quantity` exceeds stock, or
    /// `StoreError::Storage` if the write fails.
    #[instrument(skip(self, catalog))]
    pub fn set_quantity(
        &mut self,
        catalog: &CatalogStore,
        id: &ProductId,
        quantity: u32,
    ) -> Result<Option<CartLine>> {
        if quantity == 0 {
            self.remove_item(id)?;
            return Ok(None);
        }
        self.put(catalog, id, quantity).map(Some)
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the write fails.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next = self
            .lines
            .iter()
            .filter(|l| l.product_id() != id)
            .cloned()
            .collect();
        self.commit(next)?;
        debug!("Removed cart line");
        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the write fails.
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())?;
        info!("Cleared cart");
        Ok(())
    }

    /// Empty the cart. Same as [`CartStore::clear`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the write fails.
    pub fn reset(&mut self) -> Result<()> {
        self.clear()
    }

    /// Place an order for the cart's contents. See
    /// [`crate::services::checkout::place_order`].
    ///
    /// # Errors
    ///
    /// Returns any error of [`crate::services::checkout::place_order`].
    pub fn checkout(
        &mut self,
        catalog: &mut CatalogStore,
        orders: &mut OrderStore,
        user: Option<&User>,
        customer: CustomerInfo,
    ) -> Result<Order> {
        checkout::place_order(self, catalog, orders, user, customer)
    }

    /// Empty the cart after a placed order. The order already stands, so a
    /// failed write is logged and the in-memory cart is emptied anyway.
    pub(crate) fn clear_after_checkout(&mut self) {
        if let Err(e) = write_json(self.storage.as_ref(), keys::CART, &Vec::<CartLine>::new()) {
            error!(error = %e, "Order placed but cart could not be cleared");
        }
        self.lines.clear();
    }

    fn put(&mut self, catalog: &CatalogStore, id: &ProductId, quantity: u32) -> Result<CartLine> {
        let product = catalog
            .get_by_id(id)
            .ok_or_else(|| StoreError::product_not_found(id))?;

        if quantity > product.stock {
            return Err(StoreError::StockConflict(vec![StockShortage {
                product_id: id.clone(),
                name: product.name.clone(),
                requested: quantity,
                available: product.stock,
            }]));
        }

        let line = CartLine {
            product: product.clone(),
            quantity,
        };
        let mut next = self.lines.clone();
        match next.iter_mut().find(|l| l.product_id() == id) {
            Some(slot) => *slot = line.clone(),
            None => next.push(line.clone()),
        }
        self.commit(next)?;

        debug!(quantity, "Updated cart line");
        Ok(line)
    }

    fn commit(&mut self, next: Vec<CartLine>) -> std::result::Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::CART, &next)?;
        self.lines = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{FlakyStorage, customer, product};

    fn setup() -> (Arc<dyn Storage>, CatalogStore, CartStore) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let catalog = CatalogStore::with_products(
            Arc::clone(&storage),
            vec![product("1", 5), product("2", 0)],
        )
        .unwrap();
        let cart = CartStore::open(Arc::clone(&storage)).unwrap();
        (storage, catalog, cart)
    }

    #[test]
    fn test_open_merges_repeated_lines() {
        let (storage, mut catalog, _) = setup();
        let line = |quantity| CartLine {
            product: product("1", 5),
            quantity,
        };
        write_json(storage.as_ref(), keys::CART, &vec![line(3), line(0), line(3)]).unwrap();

        let mut cart = CartStore::open(Arc::clone(&storage)).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("1")), 6);

        let mut orders = OrderStore::open(storage).unwrap();
        let result = cart.checkout(&mut catalog, &mut orders, None, customer());
        match result {
            Err(StoreError::StockConflict(shortages)) => {
                assert_eq!(shortages[0].requested, 6);
                assert_eq!(shortages[0].available, 5);
            }
            other => panic!("expected stock conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_add_merges_lines() {
        let (_, catalog, mut cart) = setup();
        let id = ProductId::new("1");
        cart.add_item(&catalog, &id, 2).unwrap();
        cart.add_item(&catalog, &id, 3).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&id), 5);
        assert_eq!(cart.total(), Price::from_rupees(500));
    }

    #[test]
    fn test_add_rejects_over_stock() {
        let (_, catalog, mut cart) = setup();
        let id = ProductId::new("1");
        cart.add_item(&catalog, &id, 4).unwrap();
        let result = cart.add_item(&catalog, &id, 2);
        assert!(matches!(result, Err(StoreError::StockConflict(_))));
        assert_eq!(cart.quantity_of(&id), 4);
    }

    #[test]
    fn test_add_rejects_out_of_stock_and_unknown() {
        let (_, catalog, mut cart) = setup();
        assert!(matches!(
            cart.add_item(&catalog, &ProductId::new("2"), 1),
            Err(StoreError::StockConflict(_))
        ));
        assert!(matches!(
            cart.add_item(&catalog, &ProductId::new("9"), 1),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            cart.add_item(&catalog, &ProductId::new("1"), 0),
            Err(StoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let (_, catalog, mut cart) = setup();
        let id = ProductId::new("1");
        cart.add_item(&catalog, &id, 2).unwrap();
        assert!(cart.set_quantity(&catalog, &id, 0).unwrap().is_none());
        assert!(cart.is_empty());
        // Removing again still succeeds.
        assert!(cart.set_quantity(&catalog, &id, 0).unwrap().is_none());
    }

    #[test]
    fn test_set_quantity_adds_missing_line() {
        let (_, catalog, mut cart) = setup();
        let id = ProductId::new("1");
        let line = cart.set_quantity(&catalog, &id, 2).unwrap().unwrap();
        assert_eq!(line.quantity, 2);
        assert!(matches!(
            cart.set_quantity(&catalog, &ProductId::new("9"), 1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_quantity_checks_stock() {
        let (_, catalog, mut cart) = setup();
        let id = ProductId::new("1");
        cart.add_item(&catalog, &id, 1).unwrap();
        assert_eq!(cart.set_quantity(&catalog, &id, 5).unwrap().unwrap().quantity, 5);
        assert!(cart.set_quantity(&catalog, &id, 6).is_err());
        assert_eq!(cart.quantity_of(&id), 5);
    }

    #[test]
    fn test_cart_persists_and_reloads() {
        let (storage, catalog, mut cart) = setup();
        cart.add_item(&catalog, &ProductId::new("1"), 3).unwrap();
        let reopened = CartStore::open(storage).unwrap();
        assert_eq!(reopened.lines(), cart.lines());
        assert_eq!(reopened.item_count(), 3);
    }

    #[test]
    fn test_malformed_cart_loads_empty() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.write(keys::CART, "not json").unwrap();
        assert!(CartStore::open(storage).unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let flaky = Arc::new(FlakyStorage::default());
        let storage: Arc<dyn Storage> = Arc::clone(&flaky) as Arc<dyn Storage>;
        let catalog =
            CatalogStore::with_products(Arc::clone(&storage), vec![product("1", 5)]).unwrap();
        let mut cart = CartStore::open(storage).unwrap();
        cart.add_item(&catalog, &ProductId::new("1"), 1).unwrap();

        flaky.fail_writes(keys::CART);
        let result = cart.add_item(&catalog, &ProductId::new("1"), 1);
        assert!(matches!(result, Err(StoreError::Storage(_))));
        assert_eq!(cart.quantity_of(&ProductId::new("1")), 1);
    }
}
