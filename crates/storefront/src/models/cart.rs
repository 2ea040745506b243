//! Cart line model.

use serde::{Deserialize, Serialize};

use metamart_core::{Price, ProductId};

use super::product::Product;

/// A product and the quantity the shopper wants.
///
/// Persisted as the product snapshot fields plus `quantity`. The snapshot
/// is refreshed from the catalog whenever the line changes; stock is never
/// read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line last changed.
    #[serde(flatten)]
    pub product: Product,
    /// Desired quantity, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Snapshot price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
