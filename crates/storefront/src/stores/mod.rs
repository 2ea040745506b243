//! Stores over local storage.
//!
//! Each store owns one document (see [`crate::storage::keys`]), keeps it in
//! memory, and writes the full document back after every successful
//! mutation. A mutation is applied to a copy first and only swapped in once
//! the write succeeded, so a failed write leaves the store unchanged.
//!
//! Stores never reach each other through globals: an operation that needs
//! another store takes it as an argument.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod seed;
pub mod session;
pub mod wishlist;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::storage::{Storage, StorageError, read_json};

pub use cart::CartStore;
pub use catalog::{CatalogStore, StockReservation};
pub use orders::{OrderStats, OrderStore};
pub use session::SessionStore;
pub use wishlist::WishlistStore;

/// Load a document, treating a malformed one as absent.
///
/// I/O failures still propagate.
pub(crate) fn load_or_default<T>(storage: &dyn Storage, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    match read_json(storage, key) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(T::default()),
        Err(StorageError::Malformed { key, source }) => {
            warn!(key = %key, error = %source, "Discarding malformed document");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}
