//! Local persistence for storefront documents.
//!
//! # Layout
//!
//! Every logical store owns exactly one JSON document, addressed by key:
//!
//! - `current-user` - The signed-in user, or absent
//! - `shopping-cart` - Cart lines (product snapshot + quantity)
//! - `product-catalog` - The product catalog
//! - `order-history` - Placed orders, newest last
//! - `wishlist` - Favourited product snapshots
//!
//! Writes always replace the whole document; there is no incremental
//! persistence and no batching.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Document keys used by the stores.
pub mod keys {
    /// Signed-in user document.
    pub const CURRENT_USER: &str = "current-user";
    /// Shopping cart document.
    pub const CART: &str = "shopping-cart";
    /// Product catalog document.
    pub const CATALOG: &str = "product-catalog";
    /// Order history document.
    pub const ORDERS: &str = "order-history";
    /// Wishlist document.
    pub const WISHLIST: &str = "wishlist";
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem error.
    #[error("storage I/O error on '{key}': {source}")]
    Io {
        /// Document key being accessed.
        key: String,
        /// The I/O failure.
        #[source]
        source: io::Error,
    },

    /// Stored document could not be decoded.
    #[error("malformed document '{key}': {source}")]
    Malformed {
        /// Document key being decoded.
        key: String,
        /// The decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be encoded.
    #[error("failed to encode document '{key}': {source}")]
    Encode {
        /// Document key being encoded.
        key: String,
        /// The encode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory backend lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A key → document store.
///
/// Implementations must make `write` all-or-nothing: a reader sees either
/// the previous document or the new one, never a torn write.
pub trait Storage: Send + Sync {
    /// Read the raw document for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend fails.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend fails.
    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError>;

    /// Delete the document for `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backend fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON document.
///
/// # Errors
///
/// Returns `StorageError::Malformed` if the document exists but does not
/// decode as `T`, or any backend error.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Encode and write a JSON document.
///
/// # Errors
///
/// Returns `StorageError::Encode` if serialization fails, or any backend error.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string_pretty(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &raw)
}

// =============================================================================
// File Backend
// =============================================================================

/// Stores each document as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory documents are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        // Temp name is per-process so two sessions never share a half-written file.
        let path = self.path_for(key);
        let temp_path = self
            .dir
            .join(format!("{key}.json.{}.tmp", std::process::id()));

        let result = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .and_then(|mut file| {
                file.write_all(contents.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&temp_path, &path));

        if let Err(source) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Io {
                key: key.to_string(),
                source,
            });
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// Keeps documents in process memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let docs = self.docs.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(docs.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        let mut docs = self.docs.lock().map_err(|_| StorageError::Poisoned)?;
        docs.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut docs = self.docs.lock().map_err(|_| StorageError::Poisoned)?;
        docs.remove(key);
        Ok(())
    }
}
