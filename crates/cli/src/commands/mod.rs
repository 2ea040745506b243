//! Subcommand implementations.
//!
//! Each command prints its result to stdout; logs and errors go to stderr.

#![allow(clippy::print_stdout)]

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

use metamart_storefront::Storefront;

/// Restore the seed catalog and clear all other documents.
///
/// # Errors
///
/// Returns an error without `--yes`, or if a write fails.
pub fn reset(store: &mut Storefront, confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("refusing to reset without --yes".into());
    }
    store.reset()?;
    println!("Storefront reset to the seed catalog.");
    Ok(())
}
