//! Domain models for the storefront.
//!
//! All models serialize with camelCase field names so that documents
//! written by earlier storefront versions keep loading.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use order::{CustomerInfo, Order, OrderLine};
pub use product::{Product, ProductDraft, ProductFilter};
pub use user::User;
