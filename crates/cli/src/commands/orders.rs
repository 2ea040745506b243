//! Order history and admin order management.

use clap::Subcommand;

use metamart_core::{OrderId, OrderStatus};
use metamart_storefront::{StoreError, Storefront};

use crate::render;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List all orders, newest first (admin)
    List {
        /// Match order id or customer name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List the signed-in user's orders
    Mine,
    /// Show one order (admin, or the user who placed it)
    Show { id: String },
    /// Move an order to its next status (admin)
    Advance { id: String },
    /// Set an order's status; only the next step is allowed (admin)
    SetStatus { id: String, status: OrderStatus },
}

/// Run an order subcommand.
///
/// # Errors
///
/// Returns store errors (permissions, unknown order, invalid transition).
pub fn run(store: &mut Storefront, action: OrderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OrderAction::List { search } => {
            store.require_admin()?;
            let orders = store.orders().search(search.as_deref().unwrap_or(""));
            for order in orders.iter().rev() {
                println!("{}", render::order_row(order));
            }
            println!("{} orders", orders.len());
        }
        OrderAction::Mine => {
            let user_id = store
                .current_user()
                .map(|u| u.id.clone())
                .ok_or(StoreError::AuthRequired)?;
            let mine: Vec<_> = store
                .orders()
                .list()
                .iter()
                .rev()
                .filter(|o| o.user_id.as_ref() == Some(&user_id))
                .collect();
            if mine.is_empty() {
                println!("No orders yet.");
            }
            for order in mine {
                println!("{}", render::order_row(order));
            }
        }
        OrderAction::Show { id } => {
            let id = OrderId::new(id);
            let user = store.current_user().ok_or(StoreError::AuthRequired)?;
            let order = store
                .orders()
                .get(&id)
                .ok_or_else(|| StoreError::order_not_found(&id))?;
            if !user.is_admin && order.user_id.as_ref() != Some(&user.id) {
                return Err(StoreError::Forbidden(format!("order {id} belongs to another user")).into());
            }
            print!("{}", render::order_detail(order));
        }
        OrderAction::Advance { id } => {
            let order = store.advance_order(&OrderId::new(id))?;
            println!("Order {} is now {}", order.id, order.status);
        }
        OrderAction::SetStatus { id, status } => {
            let order = store.update_order_status(&OrderId::new(id), status)?;
            println!("Order {} is now {}", order.id, order.status);
        }
    }
    Ok(())
}

/// Print the admin dashboard.
///
/// # Errors
///
/// Returns `StoreError::AuthRequired` or `StoreError::Forbidden` for
/// non-admins.
pub fn dashboard(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = store.dashboard()?;
    print!("{}", render::dashboard(&dashboard));
    Ok(())
}
