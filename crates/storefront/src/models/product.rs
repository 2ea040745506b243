//! Product domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use metamart_core::{Price, ProductId};

use crate::error::ValidationError;

/// A sellable product.
///
/// `stock` is owned by the catalog store; nothing else writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Product page description.
    #[serde(default)]
    pub long_description: String,
    /// Current selling price.
    pub price: Price,
    /// Pre-discount price, shown struck through. Not required to exceed `price`.
    #[serde(default)]
    pub original_price: Option<Price>,
    /// Image URLs, first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category slug (e.g. `electronics`).
    #[serde(default)]
    pub category: String,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub reviews: u32,
    /// Units available for purchase.
    pub stock: u32,
    /// Units sold through checkout.
    #[serde(default)]
    pub sales: u32,
    /// Incremented on every stock change; checked when a purchase commits.
    #[serde(default)]
    pub stock_version: u64,
}

impl Product {
    /// The primary image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Case-insensitive match on name or description.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

/// Input for creating a new product (the admin product form).
///
/// Numeric fields are deliberately wide so that malformed input (negative
/// prices, negative stock) reaches validation instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name (required).
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Product page description.
    #[serde(default)]
    pub long_description: String,
    /// Selling price (required, non-negative).
    pub price: Decimal,
    /// Pre-discount price (non-negative if present).
    #[serde(default)]
    pub original_price: Option<Decimal>,
    /// Image URLs; blank entries are dropped.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category slug.
    #[serde(default)]
    pub category: String,
    /// Initial stock (required, non-negative).
    pub stock: i64,
}

impl ProductDraft {
    /// Validate the draft and build a product with the given id.
    ///
    /// New products start with no rating, reviews or sales.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank name, a negative price or
    /// original price, or stock outside `0..=u32::MAX`.
    pub fn into_product(self, id: ProductId) -> Result<Product, ValidationError> {
        let name = validate_name(&self.name)?;
        let price =
            Price::new(self.price).map_err(|e| ValidationError::new("price", e.to_string()))?;
        let original_price = self
            .original_price
            .map(Price::new)
            .transpose()
            .map_err(|e| ValidationError::new("originalPrice", e.to_string()))?;
        let stock = u32::try_from(self.stock).map_err(|_| {
            ValidationError::new(
                "stock",
                format!("must be a non-negative integer (got {})", self.stock),
            )
        })?;

        Ok(Product {
            id,
            name,
            description: self.description.trim().to_string(),
            long_description: self.long_description.trim().to_string(),
            price,
            original_price,
            images: clean_images(self.images),
            category: self.category.trim().to_string(),
            rating: 0.0,
            reviews: 0,
            stock,
            sales: 0,
            stock_version: 0,
        })
    }
}

/// Validate an edited product before it replaces the stored record.
///
/// # Errors
///
/// Returns `ValidationError` for a blank name or a rating outside 0–5.
pub fn validate_product(mut product: Product) -> Result<Product, ValidationError> {
    product.name = validate_name(&product.name)?;
    if !(0.0..=5.0).contains(&product.rating) {
        return Err(ValidationError::new(
            "rating",
            format!("must be between 0 and 5 (got {})", product.rating),
        ));
    }
    product.images = clean_images(product.images);
    Ok(product)
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "is required"));
    }
    Ok(name.to_string())
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Filter criteria for browsing the catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive term matched against name and description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Whether `product` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.trim().is_empty())
            && !product.matches_term(term.trim())
        {
            return false;
        }
        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}
