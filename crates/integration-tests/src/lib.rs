//! Integration tests for `MetaMart`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p metamart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart admission and order placement through a single session
//! - `cross_session` - two sessions sharing one data directory
//! - `order_status` - admin order management
//! - `persistence` - documents on disk, malformed input, seed fallback
//! - `proptest_cart` - randomized cart operation sequences
//!
//! This library holds the fixtures the test files share.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use metamart_core::{Email, ProductId};
use metamart_storefront::models::CustomerInfo;
use metamart_storefront::{Storefront, StorefrontConfig};

/// Valid shipping details.
#[must_use]
pub fn customer() -> CustomerInfo {
    CustomerInfo {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: Email::parse("asha@example.com").unwrap(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        postal_code: "560001".to_string(),
    }
}

/// Default configuration pointing at `dir`.
#[must_use]
pub fn config_in(dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    }
}

/// Open a file-backed session over `dir`.
#[must_use]
pub fn session_in(dir: &Path) -> Storefront {
    Storefront::open(config_in(dir)).unwrap()
}

/// Open a file-backed session over `dir` with the admin signed in.
#[must_use]
pub fn admin_session_in(dir: &Path) -> Storefront {
    let mut store = session_in(dir);
    store.login("admin@gmail.com", "admin").unwrap();
    store
}

/// Current stock of a catalog product.
#[must_use]
pub fn stock_of(store: &Storefront, id: &str) -> u32 {
    store
        .catalog()
        .get_by_id(&ProductId::new(id))
        .unwrap()
        .stock
}

/// Set a product's stock through the admin path. `store` must be signed in
/// as admin.
pub fn set_stock(store: &mut Storefront, id: &str, stock: u32) {
    let mut product = store
        .catalog()
        .get_by_id(&ProductId::new(id))
        .cloned()
        .unwrap();
    product.stock = stock;
    store.update_product(product).unwrap();
}
