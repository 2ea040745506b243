//! Unified error handling for the storefront stores.
//!
//! Every store operation returns `Result<T, StoreError>`. All variants are
//! local, recoverable conditions; the caller reports them and the affected
//! state is left unchanged.

use core::fmt;

use metamart_core::{OrderId, OrderStatus, ProductId};
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// A product whose requested quantity exceeds what is in stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortage {
    /// The product that is short.
    pub product_id: ProductId,
    /// Product name at the time of the check.
    pub name: String,
    /// Quantity the caller asked for.
    pub requested: u32,
    /// Quantity currently in stock (0 if the product no longer exists).
    pub available: u32,
}

impl fmt::Display for StockShortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (requested {}, only {} available)",
            self.name, self.requested, self.available
        )
    }
}

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input (product draft, customer details, quantities).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation on an unknown id.
    #[error("Not found: {kind} {id}")]
    NotFound {
        /// Entity kind ("product", "order").
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Requested quantity exceeds available stock.
    #[error("Not enough stock: {}", join_shortages(.0))]
    StockConflict(Vec<StockShortage>),

    /// Stock changed in another session between validation and commit.
    #[error("Stock changed while checking out: {}", join_ids(.0))]
    ConcurrentModification(Vec<ProductId>),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order status may only move one step forward.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// The order being updated.
        order_id: OrderId,
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// The operation needs a signed-in user.
    #[error("Please log in first")]
    AuthRequired,

    /// The signed-in user lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Local persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Shorthand for a missing product.
    #[must_use]
    pub fn product_not_found(id: &ProductId) -> Self {
        Self::NotFound {
            kind: "product",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing order.
    #[must_use]
    pub fn order_not_found(id: &OrderId) -> Self {
        Self::NotFound {
            kind: "order",
            id: id.to_string(),
        }
    }

    /// Whether this error is an infrastructure fault rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

fn join_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::product_not_found(&ProductId::new("42"));
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = StoreError::from(ValidationError::new("name", "is required"));
        assert_eq!(err.to_string(), "Validation error: name: is required");
    }

    #[test]
    fn test_stock_conflict_names_every_product() {
        let err = StoreError::StockConflict(vec![
            StockShortage {
                product_id: ProductId::new("1"),
                name: "Headphones".to_string(),
                requested: 6,
                available: 5,
            },
            StockShortage {
                product_id: ProductId::new("2"),
                name: "Watch".to_string(),
                requested: 1,
                available: 0,
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("Headphones (requested 6, only 5 available)"));
        assert!(message.contains("Watch (requested 1, only 0 available)"));
    }

    #[test]
    fn test_internal_classification() {
        assert!(StoreError::Storage(StorageError::Poisoned).is_internal());
        assert!(!StoreError::EmptyCart.is_internal());
        assert!(!StoreError::AuthRequired.is_internal());
    }
}
