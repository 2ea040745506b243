//! Wishlist commands.

use clap::Subcommand;

use metamart_core::ProductId;
use metamart_storefront::Storefront;

use crate::render;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add a product, or remove it if already listed
    Toggle { id: String },
}

/// Run a wishlist subcommand.
///
/// # Errors
///
/// Returns store errors (not logged in, unknown product).
pub fn run(store: &mut Storefront, action: WishlistAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WishlistAction::Show => {
            if store.wishlist().is_empty() {
                println!("Your wishlist is empty.");
            }
            for product in store.wishlist().list() {
                println!("{}", render::product_row(product));
            }
        }
        WishlistAction::Toggle { id } => {
            let id = ProductId::new(id);
            if store.toggle_wishlist(&id)? {
                println!("Added {id} to wishlist");
            } else {
                println!("Removed {id} from wishlist");
            }
        }
    }
    Ok(())
}
