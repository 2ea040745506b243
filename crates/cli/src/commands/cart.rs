//! Cart and checkout commands.

use clap::{Args, Subcommand};

use metamart_core::{Email, ProductId};
use metamart_storefront::Storefront;
use metamart_storefront::models::CustomerInfo;

use crate::render;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add units of a product
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a product's quantity; 0 removes it
    Set { id: String, quantity: u32 },
    /// Remove a product
    Remove { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: Email,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
}

/// Run a cart subcommand.
///
/// # Errors
///
/// Returns store errors (unknown product, not enough stock).
pub fn run(store: &mut Storefront, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CartAction::Show => {}
        CartAction::Add { id, quantity } => {
            let line = store.add_to_cart(&ProductId::new(id), quantity)?;
            println!(
                "Added {} x {} (now {} in cart)",
                quantity, line.product.name, line.quantity
            );
        }
        CartAction::Set { id, quantity } => {
            match store.set_cart_quantity(&ProductId::new(id), quantity)? {
                Some(line) => println!("{} x {}", line.quantity, line.product.name),
                None => println!("Removed from cart"),
            }
        }
        CartAction::Remove { id } => {
            if !store.remove_from_cart(&ProductId::new(id))? {
                println!("Not in cart");
            }
        }
        CartAction::Clear => store.clear_cart()?,
    }
    print!("{}", render::cart(store.cart()));
    Ok(())
}

/// Place an order for the cart.
///
/// # Errors
///
/// Returns store errors (empty cart, invalid details, stock conflicts).
pub fn checkout(store: &mut Storefront, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let customer = CustomerInfo {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        postal_code: args.postal_code,
    };
    let order = store.checkout(customer)?;
    println!("Order placed!");
    print!("{}", render::order_detail(&order));
    Ok(())
}
