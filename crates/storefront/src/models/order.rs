//! Order domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use metamart_core::{Email, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::error::ValidationError;

/// Shipping and contact details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl CustomerInfo {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Trim every field and reject blanks.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first blank field.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("firstName", &mut self.first_name),
            ("lastName", &mut self.last_name),
            ("phone", &mut self.phone),
            ("address", &mut self.address),
            ("city", &mut self.city),
            ("postalCode", &mut self.postal_code),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::new(field, "is required"));
            }
            *value = trimmed.to_string();
        }
        Ok(self)
    }
}

/// A purchased product, copied from the catalog at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderLine {
    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A completed, stock-committed purchase.
///
/// Only `status` changes after creation, and only through the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Signed-in user who placed the order, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub customer_info: CustomerInfo,
    pub line_items: Vec<OrderLine>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Case-insensitive match on order id or customer name.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        self.id.as_str().to_lowercase().contains(&term)
            || self.customer_info.full_name().to_lowercase().contains(&term)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            first_name: " Asha ".to_string(),
            last_name: "Rao".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
        }
    }

    #[test]
    fn test_validate_trims() {
        let info = customer().validate().unwrap();
        assert_eq!(info.first_name, "Asha");
        assert_eq!(info.full_name(), "Asha Rao");
    }

    #[test]
    fn test_validate_rejects_blank() {
        let mut info = customer();
        info.city = "  ".to_string();
        assert_eq!(info.validate().unwrap_err().field, "city");
    }

    #[test]
    fn test_matches_term() {
        let order = Order {
            id: OrderId::new("ORD-ABC123"),
            user_id: None,
            customer_info: customer().validate().unwrap(),
            line_items: vec![],
            total: Price::ZERO,
            status: OrderStatus::Confirmed,
            created_at: Utc::now(),
        };
        assert!(order.matches_term("abc"));
        assert!(order.matches_term("asha rao"));
        assert!(!order.matches_term("vikram"));
    }
}
