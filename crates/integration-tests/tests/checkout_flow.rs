//! Integration tests for cart admission and checkout within one session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use rust_decimal::Decimal;

use metamart_core::{OrderStatus, Price, ProductId};
use metamart_integration_tests::{customer, set_stock, stock_of};
use metamart_storefront::models::ProductDraft;
use metamart_storefront::{StoreError, Storefront};

fn admin_store() -> Storefront {
    let mut store = Storefront::in_memory().unwrap();
    store.login("admin@gmail.com", "admin").unwrap();
    store
}

// =============================================================================
// Cart Admission
// =============================================================================

#[test]
fn test_single_product_walkthrough() {
    let mut store = admin_store();
    let id = ProductId::new("1");
    set_stock(&mut store, "1", 5);

    store.add_to_cart(&id, 3).unwrap();
    assert!(matches!(
        store.add_to_cart(&id, 3),
        Err(StoreError::StockConflict(_))
    ));
    assert_eq!(store.cart().quantity_of(&id), 3);

    store.set_cart_quantity(&id, 5).unwrap();
    assert!(matches!(
        store.set_cart_quantity(&id, 6),
        Err(StoreError::StockConflict(_))
    ));
    assert_eq!(store.cart().quantity_of(&id), 5);

    let order = store.checkout(customer()).unwrap();

    assert_eq!(stock_of(&store, "1"), 0);
    assert!(store.cart().is_empty());
    assert_eq!(store.orders().len(), 1);
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.line_items.len(), 1);
    assert_eq!(order.line_items[0].quantity, 5);
    assert_eq!(order.total, Price::from_rupees(8999 * 5));
}

#[test]
fn test_set_quantity_zero_matches_remove() {
    let mut by_set = Storefront::in_memory().unwrap();
    let mut by_remove = Storefront::in_memory().unwrap();
    for store in [&mut by_set, &mut by_remove] {
        store.add_to_cart(&ProductId::new("1"), 2).unwrap();
        store.add_to_cart(&ProductId::new("2"), 1).unwrap();
    }

    by_set.set_cart_quantity(&ProductId::new("1"), 0).unwrap();
    by_remove.remove_from_cart(&ProductId::new("1")).unwrap();

    assert_eq!(by_set.cart().lines(), by_remove.cart().lines());
}

#[test]
fn test_out_of_stock_product_cannot_be_added() {
    let mut store = admin_store();
    set_stock(&mut store, "2", 0);

    let result = store.add_to_cart(&ProductId::new("2"), 1);
    match result {
        Err(StoreError::StockConflict(shortages)) => {
            assert_eq!(shortages[0].available, 0);
            assert_eq!(shortages[0].requested, 1);
        }
        other => panic!("expected stock conflict, got {other:?}"),
    }
    assert!(store.cart().is_empty());
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_empty_cart_checkout_creates_no_order() {
    let mut store = Storefront::in_memory().unwrap();
    assert!(matches!(
        store.checkout(customer()),
        Err(StoreError::EmptyCart)
    ));
    assert!(store.orders().is_empty());
}

#[test]
fn test_checkout_is_all_or_nothing() {
    let mut store = admin_store();
    store.add_to_cart(&ProductId::new("1"), 2).unwrap();
    store.add_to_cart(&ProductId::new("5"), 4).unwrap();

    // Stock for one line drops below the cart quantity before checkout.
    set_stock(&mut store, "5", 3);

    let result = store.checkout(customer());
    match result {
        Err(StoreError::StockConflict(shortages)) => {
            assert_eq!(shortages.len(), 1);
            assert_eq!(shortages[0].product_id, ProductId::new("5"));
        }
        other => panic!("expected stock conflict, got {other:?}"),
    }

    assert_eq!(stock_of(&store, "1"), 25);
    assert_eq!(stock_of(&store, "5"), 3);
    assert_eq!(store.cart().item_count(), 6);
    assert!(store.orders().is_empty());
}

#[test]
fn test_checkout_decrements_each_product_once() {
    let mut store = Storefront::in_memory().unwrap();
    store.add_to_cart(&ProductId::new("3"), 4).unwrap();
    store.add_to_cart(&ProductId::new("8"), 10).unwrap();
    store.add_to_cart(&ProductId::new("3"), 1).unwrap();

    let order = store.checkout(customer()).unwrap();

    assert_eq!(stock_of(&store, "3"), 45);
    assert_eq!(stock_of(&store, "8"), 90);
    assert_eq!(order.item_count(), 15);

    let sold = store.catalog().get_by_id(&ProductId::new("3")).unwrap();
    assert_eq!(sold.sales, 305);
}

#[test]
fn test_checkout_rejects_bad_customer_details() {
    let mut store = Storefront::in_memory().unwrap();
    store.add_to_cart(&ProductId::new("4"), 1).unwrap();
    let mut info = customer();
    info.postal_code = "   ".to_string();

    let result = store.checkout(info);
    assert!(matches!(result, Err(StoreError::Validation(ref v)) if v.field == "postalCode"));
    assert_eq!(stock_of(&store, "4"), 30);
    assert_eq!(store.cart().item_count(), 1);
}

#[test]
fn test_new_product_can_be_bought() {
    let mut store = admin_store();
    let product = store
        .create_product(ProductDraft {
            name: "Desk Fan".to_string(),
            price: Decimal::new(1499, 0),
            stock: 2,
            category: "home".to_string(),
            ..ProductDraft::default()
        })
        .unwrap();
    assert_eq!(store.catalog().len(), 9);

    store.add_to_cart(&product.id, 2).unwrap();
    let order = store.checkout(customer()).unwrap();
    assert_eq!(order.total, Price::from_rupees(2998));
    assert_eq!(stock_of(&store, product.id.as_str()), 0);
    assert_eq!(store.catalog().out_of_stock().len(), 1);
}
