//! Order history store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use metamart_core::{OrderId, OrderStatus, Price};

use super::load_or_default;
use crate::error::{Result, StoreError};
use crate::models::Order;
use crate::storage::{Storage, StorageError, keys, write_json};

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    pub order_count: usize,
    /// Distinct customer emails, compared case-insensitively.
    pub customer_count: usize,
    /// Sum of order totals.
    pub revenue: Price,
}

/// Store for the order history document, oldest order first.
///
/// Writes re-read the persisted history first so that orders appended by
/// another session are kept.
pub struct OrderStore {
    storage: Arc<dyn Storage>,
    orders: Vec<Order>,
}

impl OrderStore {
    /// Open the order history. A malformed document loads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn open(storage: Arc<dyn Storage>) -> std::result::Result<Self, StorageError> {
        let orders = load_or_default(storage.as_ref(), keys::ORDERS)?;
        Ok(Self { storage, orders })
    }

    /// Re-read the persisted history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn reload(&mut self) -> std::result::Result<(), StorageError> {
        self.orders = load_or_default(self.storage.as_ref(), keys::ORDERS)?;
        Ok(())
    }

    /// Drop every order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn reset(&mut self) -> std::result::Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::ORDERS, &Vec::<Order>::new())?;
        self.orders.clear();
        Ok(())
    }

    /// All orders, oldest first.
    #[must_use]
    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// The `n` most recent orders, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&Order> {
        self.orders.iter().rev().take(n).collect()
    }

    /// Orders whose id or customer name contains `term`. A blank term
    /// matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Order> {
        if term.trim().is_empty() {
            return self.orders.iter().collect();
        }
        self.orders.iter().filter(|o| o.matches_term(term)).collect()
    }

    /// Dashboard figures over the whole history.
    #[must_use]
    pub fn stats(&self) -> OrderStats {
        let customers: HashSet<String> = self
            .orders
            .iter()
            .map(|o| o.customer_info.email.as_str().to_lowercase())
            .collect();
        OrderStats {
            order_count: self.orders.len(),
            customer_count: customers.len(),
            revenue: self.orders.iter().map(|o| o.total).sum(),
        }
    }

    /// Record a placed order. Only checkout calls this.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails; the history is unchanged.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub(crate) fn append(&mut self, order: Order) -> std::result::Result<(), StorageError> {
        let mut next: Vec<Order> = load_or_default(self.storage.as_ref(), keys::ORDERS)?;
        next.push(order);
        write_json(self.storage.as_ref(), keys::ORDERS, &next)?;
        self.orders = next;
        info!("Recorded order");
        Ok(())
    }

    /// Move an order to `status`, which must be the next step after its
    /// current status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id,
    /// `StoreError::InvalidStatusTransition` for any other target, or
    /// `StoreError::Storage` if the write fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let mut next: Vec<Order> = load_or_default(self.storage.as_ref(), keys::ORDERS)?;
        let order = next
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::order_not_found(id))?;

        if !order.status.can_transition_to(status) {
            warn!(from = %order.status, to = %status, "Rejected status change");
            return Err(StoreError::InvalidStatusTransition {
                order_id: id.clone(),
                from: order.status,
                to: status,
            });
        }

        let from = order.status;
        order.status = status;
        let updated = order.clone();
        write_json(self.storage.as_ref(), keys::ORDERS, &next)?;
        self.orders = next;

        info!(%from, to = %status, "Updated order status");
        Ok(updated)
    }

    /// Move an order one step forward.
    ///
    /// # Errors
    ///
    /// As [`OrderStore::update_status`]; a delivered order cannot advance.
    pub fn advance(&mut self, id: &OrderId) -> Result<Order> {
        let current = self
            .get(id)
            .map(|o| o.status)
            .ok_or_else(|| StoreError::order_not_found(id))?;
        let target = current.next().unwrap_or(current);
        self.update_status(id, target)
    }
}
