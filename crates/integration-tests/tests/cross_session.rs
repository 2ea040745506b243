//! Integration tests for two sessions sharing one data directory.
//!
//! Each session is a separate `Storefront` over the same files, the way two
//! `mm-cli` invocations (or two shoppers) would see the store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use std::sync::Arc;

use tempfile::TempDir;

use metamart_core::ProductId;
use metamart_integration_tests::{admin_session_in, customer, session_in, stock_of};
use metamart_storefront::StoreError;
use metamart_storefront::storage::{FileStorage, Storage};
use metamart_storefront::stores::{CatalogStore, StockReservation};

// =============================================================================
// Checkout Races
// =============================================================================

#[test]
fn test_second_session_purchase_blocks_oversell() {
    let dir = TempDir::new().unwrap();
    let camera = ProductId::new("5");

    let mut first = session_in(dir.path());
    first.add_to_cart(&camera, 10).unwrap();

    let mut second = session_in(dir.path());
    // The two sessions share the cart document; clear it for the second shopper.
    second.clear_cart().unwrap();
    second.add_to_cart(&camera, 1).unwrap();
    second.checkout(customer()).unwrap();

    // `first` still holds its in-memory cart of 10 from before.
    let result = first.checkout(customer());
    match result {
        Err(StoreError::StockConflict(shortages)) => {
            assert_eq!(shortages[0].requested, 10);
            assert_eq!(shortages[0].available, 9);
        }
        other => panic!("expected stock conflict, got {other:?}"),
    }

    let reopened = session_in(dir.path());
    assert_eq!(stock_of(&reopened, "5"), 9);
    assert_eq!(reopened.orders().len(), 1);
}

#[test]
fn test_interleaved_purchases_do_not_lose_updates() {
    let dir = TempDir::new().unwrap();
    let chair = ProductId::new("7");

    let mut first = session_in(dir.path());
    first.add_to_cart(&chair, 2).unwrap();

    let mut second = session_in(dir.path());
    second.clear_cart().unwrap();
    second.add_to_cart(&chair, 3).unwrap();
    second.checkout(customer()).unwrap();

    first.checkout(customer()).unwrap();

    let reopened = session_in(dir.path());
    assert_eq!(stock_of(&reopened, "7"), 18 - 3 - 2);
    assert_eq!(reopened.orders().len(), 2);
}

#[test]
fn test_stale_stock_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());

    let mut ours = CatalogStore::open(Arc::clone(&storage)).unwrap();
    let mut theirs = CatalogStore::open(Arc::clone(&storage)).unwrap();

    let lamp = ProductId::new("4");
    let version = ours.get_by_id(&lamp).unwrap().stock_version;
    theirs.decrement_stock(&lamp, 1).unwrap();

    let result = ours.commit_purchase(&[StockReservation {
        product_id: lamp.clone(),
        quantity: 1,
        expected_version: version,
    }]);
    assert!(matches!(result, Err(StoreError::ConcurrentModification(ref ids)) if ids == &vec![lamp.clone()]));

    let fresh = CatalogStore::open(storage).unwrap();
    assert_eq!(fresh.get_by_id(&lamp).unwrap().stock, 29);
}

#[test]
fn test_stale_catalog_decrement_keeps_other_purchases() {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let mut stale = CatalogStore::open(Arc::clone(&storage)).unwrap();

    let mut shopper = session_in(dir.path());
    shopper.add_to_cart(&ProductId::new("4"), 10).unwrap();
    shopper.checkout(customer()).unwrap();

    let lamp = stale.decrement_stock(&ProductId::new("4"), 1).unwrap();
    assert_eq!(lamp.stock, 19);

    let reopened = session_in(dir.path());
    assert_eq!(stock_of(&reopened, "4"), 19);
    assert_eq!(
        reopened.catalog().get_by_id(&ProductId::new("4")).unwrap().sales,
        95 + 10
    );
}

#[test]
fn test_stale_catalog_restock_keeps_other_purchases() {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let mut stale = CatalogStore::open(Arc::clone(&storage)).unwrap();

    let mut shopper = session_in(dir.path());
    shopper.add_to_cart(&ProductId::new("7"), 5).unwrap();
    shopper.checkout(customer()).unwrap();

    stale
        .restock(&[StockReservation {
            product_id: ProductId::new("7"),
            quantity: 2,
            expected_version: 0,
        }])
        .unwrap();

    let reopened = session_in(dir.path());
    assert_eq!(stock_of(&reopened, "7"), 18 - 5 + 2);
}

// =============================================================================
// Admin Edits
// =============================================================================

#[test]
fn test_admin_edit_is_visible_to_shopper() {
    let dir = TempDir::new().unwrap();
    let mut shopper = session_in(dir.path());
    let mut admin = admin_session_in(dir.path());

    let mut coffee = admin
        .catalog()
        .get_by_id(&ProductId::new("8"))
        .cloned()
        .unwrap();
    coffee.stock = 1;
    admin.update_product(coffee).unwrap();

    assert!(matches!(
        shopper.add_to_cart(&ProductId::new("8"), 2),
        Err(StoreError::StockConflict(_))
    ));
    shopper.add_to_cart(&ProductId::new("8"), 1).unwrap();
}

#[test]
fn test_shopper_purchase_survives_admin_edit() {
    let dir = TempDir::new().unwrap();
    let mut admin = admin_session_in(dir.path());
    let mut shopper = session_in(dir.path());

    shopper.add_to_cart(&ProductId::new("6"), 2).unwrap();
    shopper.checkout(customer()).unwrap();

    admin.refresh().unwrap();
    let mut bag = admin
        .catalog()
        .get_by_id(&ProductId::new("6"))
        .cloned()
        .unwrap();
    assert_eq!(bag.stock, 20);
    bag.name = "Leather Weekender".to_string();
    bag.stock = 30;
    admin.update_product(bag).unwrap();

    let reopened = session_in(dir.path());
    let bag = reopened.catalog().get_by_id(&ProductId::new("6")).unwrap();
    assert_eq!(bag.name, "Leather Weekender");
    assert_eq!(bag.stock, 30);
    assert_eq!(bag.sales, 82);
    assert_eq!(bag.stock_version, 2);
}
