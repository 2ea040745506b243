//! Fixtures shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::io;
use std::sync::Mutex;

use metamart_core::{Email, Price, ProductId};

use crate::models::{CustomerInfo, Product};
use crate::storage::{MemoryStorage, Storage, StorageError};

/// A product priced at ₹100 with the given stock.
pub fn product(id: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        long_description: String::new(),
        price: Price::from_rupees(100),
        original_price: None,
        images: vec![format!("https://img/{id}.jpg")],
        category: "home".to_string(),
        rating: 4.0,
        reviews: 1,
        stock,
        sales: 0,
        stock_version: 0,
    }
}

#[allow(clippy::unwrap_used)]
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

/// In-memory storage whose writes to selected keys fail.
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    failing: Mutex<HashSet<String>>,
}

impl FlakyStorage {
    pub fn fail_writes(&self, key: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(key.to_string());
        }
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        let failing = self.failing.lock().map_err(|_| StorageError::Poisoned)?;
        if failing.contains(key) {
            return Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::other("disk full"),
            });
        }
        Ok(())
    }
}

impl Storage for FlakyStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.write(key, contents)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
