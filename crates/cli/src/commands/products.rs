//! Catalog commands.
//!
//! ```bash
//! mm-cli products list --search lamp
//! mm-cli products show 4
//! mm-cli products create --name "Desk Fan" --price 1499 --stock 12 --category home
//! mm-cli products update 4 --stock 40
//! mm-cli products delete 4
//! ```

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use metamart_core::{Price, ProductId};
use metamart_storefront::Storefront;
use metamart_storefront::models::{ProductDraft, ProductFilter};

use crate::render;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products, optionally filtered
    List {
        /// Match name or description
        #[arg(short, long)]
        search: Option<String>,
        /// Exact category
        #[arg(short, long)]
        category: Option<String>,
        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<Price>,
        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Price>,
    },
    /// Show one product
    Show { id: String },
    /// List categories
    Categories,
    /// Create a product (admin)
    Create(ProductFields),
    /// Edit a product (admin); omitted fields keep their value
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductUpdate,
    },
    /// Delete a product (admin)
    Delete { id: String },
}

#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    name: String,
    #[arg(long, allow_hyphen_values = true)]
    price: Decimal,
    #[arg(long, allow_hyphen_values = true)]
    original_price: Option<Decimal>,
    #[arg(long, allow_hyphen_values = true)]
    stock: i64,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    long_description: String,
    /// Image URL; repeat for several
    #[arg(long = "image")]
    images: Vec<String>,
}

#[derive(Args)]
pub struct ProductUpdate {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<Price>,
    #[arg(long)]
    original_price: Option<Price>,
    #[arg(long)]
    stock: Option<u32>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    long_description: Option<String>,
    /// Replace the image list; repeat for several
    #[arg(long = "image")]
    images: Vec<String>,
}

/// Run a product subcommand.
///
/// # Errors
///
/// Returns store errors (unknown product, validation, permissions).
pub fn run(store: &mut Storefront, action: ProductAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProductAction::List {
            search,
            category,
            min_price,
            max_price,
        } => {
            let filter = ProductFilter {
                search,
                category,
                min_price,
                max_price,
            };
            let products = store.catalog().search(&filter);
            for product in &products {
                println!("{}", render::product_row(product));
            }
            println!("{} of {} products", products.len(), store.catalog().len());
        }
        ProductAction::Show { id } => {
            let id = ProductId::new(id);
            let product = store
                .catalog()
                .get_by_id(&id)
                .ok_or_else(|| format!("no product with id {id}"))?;
            print!("{}", render::product_detail(product));
        }
        ProductAction::Categories => {
            for category in store.catalog().categories() {
                println!("{category}");
            }
        }
        ProductAction::Create(fields) => {
            let draft = ProductDraft {
                name: fields.name,
                description: fields.description,
                long_description: fields.long_description,
                price: fields.price,
                original_price: fields.original_price,
                images: fields.images,
                category: fields.category,
                stock: fields.stock,
            };
            let product = store.create_product(draft)?;
            println!("Created product {} ({})", product.name, product.id);
        }
        ProductAction::Update { id, fields } => {
            let id = ProductId::new(id);
            let mut product = store
                .catalog()
                .get_by_id(&id)
                .cloned()
                .ok_or_else(|| format!("no product with id {id}"))?;
            apply_update(&mut product, fields);
            let product = store.update_product(product)?;
            println!("Updated product {} ({})", product.name, product.id);
        }
        ProductAction::Delete { id } => {
            let id = ProductId::new(id);
            if store.delete_product(&id)? {
                println!("Deleted product {id}");
            } else {
                println!("No product {id}; nothing to delete");
            }
        }
    }
    Ok(())
}

fn apply_update(product: &mut metamart_storefront::models::Product, fields: ProductUpdate) {
    if let Some(name) = fields.name {
        product.name = name;
    }
    if let Some(price) = fields.price {
        product.price = price;
    }
    if let Some(original) = fields.original_price {
        product.original_price = Some(original);
    }
    if let Some(stock) = fields.stock {
        product.stock = stock;
    }
    if let Some(category) = fields.category {
        product.category = category;
    }
    if let Some(description) = fields.description {
        product.description = description;
    }
    if let Some(long_description) = fields.long_description {
        product.long_description = long_description;
    }
    if !fields.images.is_empty() {
        product.images = fields.images;
    }
}
