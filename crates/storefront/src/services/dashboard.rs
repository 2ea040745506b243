//! Admin dashboard summary.

use crate::models::{Order, Product};
use crate::stores::{CatalogStore, OrderStats, OrderStore};

/// Number of orders listed under "recent orders".
pub const RECENT_ORDER_COUNT: usize = 5;

/// Everything the admin dashboard shows, borrowed from the stores.
#[derive(Debug)]
pub struct Dashboard<'a> {
    pub stats: OrderStats,
    pub product_count: usize,
    /// In stock but at or below the threshold, lowest first.
    pub low_stock: Vec<&'a Product>,
    pub out_of_stock: Vec<&'a Product>,
    /// Newest first.
    pub recent_orders: Vec<&'a Order>,
}

/// Build the dashboard from current store contents.
#[must_use]
pub fn build<'a>(
    catalog: &'a CatalogStore,
    orders: &'a OrderStore,
    low_stock_threshold: u32,
) -> Dashboard<'a> {
    Dashboard {
        stats: orders.stats(),
        product_count: catalog.len(),
        low_stock: catalog.low_stock(low_stock_threshold),
        out_of_stock: catalog.out_of_stock(),
        recent_orders: orders.recent(RECENT_ORDER_COUNT),
    }
}
