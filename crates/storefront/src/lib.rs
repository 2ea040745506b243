//! `MetaMart` storefront library.
//!
//! A storefront (catalog, cart, wishlist, checkout, order history and the
//! admin operations over them) persisted as JSON documents in local
//! storage. Open a [`Storefront`] and drive everything through it.
//!
//! ```no_run
//! use metamart_core::ProductId;
//! use metamart_storefront::{Storefront, StorefrontConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Storefront::open(StorefrontConfig::from_env()?)?;
//! store.add_to_cart(&ProductId::new("1"), 2)?;
//! println!("{} items", store.cart().item_count());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, StorefrontConfig};
pub use error::{Result, StoreError};
pub use state::Storefront;
