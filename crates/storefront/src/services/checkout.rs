//! Checkout: turn the cart into an order.
//!
//! Two phases. First every cart line is checked against the freshly
//! reloaded catalog; any shortage aborts with nothing written. Then the
//! stock for all lines is committed in one catalog write, the order is
//! recorded, and the cart is cleared.

use chrono::Utc;
use tracing::{error, info, instrument};

use metamart_core::{OrderId, OrderStatus, Price};

use crate::error::{Result, StockShortage, StoreError};
use crate::models::{CustomerInfo, Order, OrderLine, User};
use crate::stores::{CartStore, CatalogStore, OrderStore, StockReservation};

/// Stock reservations and order lines for a cart that passed validation.
#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    pub reservations: Vec<StockReservation>,
    /// Lines at live catalog prices.
    pub lines: Vec<OrderLine>,
    pub total: Price,
}

/// Check every cart line against live stock.
///
/// # Errors
///
/// Returns `StoreError::EmptyCart` for an empty cart, or
/// `StoreError::StockConflict` naming every line that is short (a product
/// removed from the catalog counts as zero stock).
pub fn validate_cart(cart: &CartStore, catalog: &CatalogStore) -> Result<CheckoutPlan> {
    if cart.is_empty() {
        return Err(StoreError::EmptyCart);
    }

    let mut shortages = Vec::new();
    let mut reservations = Vec::with_capacity(cart.lines().len());
    let mut lines = Vec::with_capacity(cart.lines().len());

    for line in cart.lines() {
        let Some(product) = catalog.get_by_id(line.product_id()) else {
            shortages.push(StockShortage {
                product_id: line.product_id().clone(),
                name: line.product.name.clone(),
                requested: line.quantity,
                available: 0,
            });
            continue;
        };
        if line.quantity > product.stock {
            shortages.push(StockShortage {
                product_id: product.id.clone(),
                name: product.name.clone(),
                requested: line.quantity,
                available: product.stock,
            });
            continue;
        }

        reservations.push(StockReservation {
            product_id: product.id.clone(),
            quantity: line.quantity,
            expected_version: product.stock_version,
        });
        lines.push(OrderLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: line.quantity,
            image: product.primary_image().map(str::to_string),
        });
    }

    if !shortages.is_empty() {
        return Err(StoreError::StockConflict(shortages));
    }

    let total = lines.iter().map(OrderLine::line_total).sum();
    Ok(CheckoutPlan {
        reservations,
        lines,
        total,
    })
}

/// Place an order for everything in the cart.
///
/// On success stock has been decremented once per line, the order is
/// recorded with status `confirmed`, and the cart is empty. On any
/// validation or conflict error nothing has changed. If the order cannot be
/// recorded after stock was committed, the stock is put back before the
/// error is returned.
///
/// # Errors
///
/// Returns `StoreError::EmptyCart`, `StoreError::Validation` for bad
/// customer details, `StoreError::StockConflict`,
/// `StoreError::ConcurrentModification` if another session changed stock
/// mid-checkout, or `StoreError::Storage`.
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub fn place_order(
    cart: &mut CartStore,
    catalog: &mut CatalogStore,
    orders: &mut OrderStore,
    user: Option<&User>,
    customer: CustomerInfo,
) -> Result<Order> {
    if cart.is_empty() {
        return Err(StoreError::EmptyCart);
    }
    let customer = customer.validate()?;

    catalog.reload()?;
    let plan = validate_cart(cart, catalog)?;
    catalog.commit_purchase(&plan.reservations)?;

    let order = Order {
        id: OrderId::generate(),
        user_id: user.map(|u| u.id.clone()),
        customer_info: customer,
        line_items: plan.lines,
        total: plan.total,
        status: OrderStatus::Confirmed,
        created_at: Utc::now(),
    };

    if let Err(e) = orders.append(order.clone()) {
        error!(error = %e, order_id = %order.id, "Failed to record order, restocking");
        if let Err(restock) = catalog.restock(&plan.reservations) {
            error!(error = %restock, "Restock failed; stock is short by the reserved units");
        }
        return Err(e.into());
    }

    cart.clear_after_checkout();
    info!(order_id = %order.id, total = %order.total, "Order placed");
    Ok(order)
}
