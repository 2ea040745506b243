//! Plain-text rendering of store contents.

use std::fmt::Write;

use metamart_storefront::models::{CartLine, Order, Product};
use metamart_storefront::services::dashboard::Dashboard;
use metamart_storefront::stores::CartStore;

/// One catalog line: id, name, price, stock.
pub fn product_row(product: &Product) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };
    format!(
        "{:<36}  {:<32}  {:>12}  {}",
        product.id, product.name, product.price.to_string(), stock
    )
}

/// Full product page.
pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    match product.original_price {
        Some(original) if original != product.price => {
            let _ = writeln!(out, "Price: {} (was {original})", product.price);
        }
        _ => {
            let _ = writeln!(out, "Price: {}", product.price);
        }
    }
    let _ = writeln!(
        out,
        "Category: {}  Rating: {:.1} ({} reviews)  Sold: {}",
        product.category, product.rating, product.reviews, product.sales
    );
    let _ = writeln!(out, "Stock: {}", product.stock);
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    if !product.long_description.is_empty() {
        let _ = writeln!(out, "{}", product.long_description);
    }
    for image in &product.images {
        let _ = writeln!(out, "  {image}");
    }
    out
}

fn cart_line(line: &CartLine) -> String {
    format!(
        "{:<36}  {:<32}  {:>4} x {:>10} = {:>12}",
        line.product_id(),
        line.product.name,
        line.quantity,
        line.product.price.to_string(),
        line.line_total().to_string()
    )
}

/// The cart with totals.
pub fn cart(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }
    let mut out = String::new();
    for line in cart.lines() {
        let _ = writeln!(out, "{}", cart_line(line));
    }
    let _ = writeln!(out, "{} items, total {}", cart.item_count(), cart.total());
    out
}

/// One order line in a listing.
pub fn order_row(order: &Order) -> String {
    format!(
        "{:<40}  {:<24}  {:>3} items  {:>12}  {:<10}  {}",
        order.id,
        order.customer_info.full_name(),
        order.item_count(),
        order.total.to_string(),
        order.status.to_string(),
        order.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// Full order with lines and shipping details.
pub fn order_detail(order: &Order) -> String {
    let info = &order.customer_info;
    let mut out = String::new();
    let _ = writeln!(out, "Order {} ({})", order.id, order.status);
    let _ = writeln!(out, "Placed {}", order.created_at.to_rfc3339());
    let _ = writeln!(out, "Ship to: {}, {}", info.full_name(), info.phone);
    let _ = writeln!(out, "         {}, {} {}", info.address, info.city, info.postal_code);
    let _ = writeln!(out, "Email:   {}", info.email);
    for line in &order.line_items {
        let _ = writeln!(
            out,
            "  {:<32}  {:>4} x {:>10} = {:>12}",
            line.name,
            line.quantity,
            line.price.to_string(),
            line.line_total().to_string()
        );
    }
    let _ = writeln!(out, "Total: {}", order.total);
    out
}

/// Admin dashboard summary.
pub fn dashboard(dashboard: &Dashboard<'_>) -> String {
    let mut out = String::new();
    let stats = &dashboard.stats;
    let _ = writeln!(out, "Revenue:   {}", stats.revenue);
    let _ = writeln!(out, "Orders:    {}", stats.order_count);
    let _ = writeln!(out, "Customers: {}", stats.customer_count);
    let _ = writeln!(out, "Products:  {}", dashboard.product_count);

    let _ = writeln!(out, "\nRecent orders:");
    if dashboard.recent_orders.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for order in &dashboard.recent_orders {
        let _ = writeln!(out, "  {}", order_row(order));
    }

    let _ = writeln!(out, "\nLow stock ({}):", dashboard.low_stock.len());
    for product in &dashboard.low_stock {
        let _ = writeln!(out, "  {} - {} left", product.name, product.stock);
    }
    let _ = writeln!(out, "\nOut of stock ({}):", dashboard.out_of_stock.len());
    for product in &dashboard.out_of_stock {
        let _ = writeln!(out, "  {}", product.name);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use metamart_core::ProductId;
    use metamart_storefront::Storefront;

    use super::*;

    #[test]
    fn test_product_detail_shows_discount() {
        let store = Storefront::in_memory().unwrap();
        let product = store.catalog().get_by_id(&ProductId::new("1")).unwrap();
        let text = product_detail(product);
        assert!(text.contains("Wireless Bluetooth Headphones"));
        assert!(text.contains("(was ₹12999)"));
    }

    #[test]
    fn test_empty_cart() {
        let store = Storefront::in_memory().unwrap();
        assert_eq!(cart(store.cart()), "Your cart is empty.\n");
    }

    #[test]
    fn test_cart_totals() {
        let mut store = Storefront::in_memory().unwrap();
        store.add_to_cart(&ProductId::new("8"), 3).unwrap();
        let text = cart(store.cart());
        assert!(text.contains("3 items, total ₹5997"));
    }
}
