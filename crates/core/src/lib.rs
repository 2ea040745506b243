//! MetaMart Core - Shared types library.
//!
//! This crate provides the value types used across all MetaMart components:
//! - `storefront` - Catalog, cart, wishlist, order and checkout stores
//! - `cli` - Command-line front end over the storefront stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no logging.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
