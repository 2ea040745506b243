//! `MetaMart` CLI - storefront and admin panel over local storage.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! mm-cli products list --category electronics --max-price 20000
//!
//! # Shop
//! mm-cli cart add 1 --quantity 2
//! mm-cli checkout --first-name Asha --last-name Rao --email asha@example.com \
//!     --phone 9876543210 --address "12 MG Road" --city Bengaluru --postal-code 560001
//!
//! # Administer
//! mm-cli auth login -e admin@gmail.com -p admin
//! mm-cli dashboard
//! mm-cli orders advance ORD-1A2B3C
//! ```
//!
//! # Commands
//!
//! - `products` - Browse and (as admin) manage the catalog
//! - `cart` - Manage the shopping cart
//! - `wishlist` - Manage the wishlist (requires login)
//! - `checkout` - Place an order for the cart
//! - `orders` - Order history and (as admin) status updates
//! - `auth` - Log in, sign up, log out
//! - `dashboard` - Admin summary
//! - `reset` - Restore the seed catalog and clear everything else

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metamart_storefront::{Storefront, StorefrontConfig};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "mm-cli")]
#[command(author, version, about = "MetaMart storefront CLI")]
struct Cli {
    /// Data directory (overrides `METAMART_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistAction,
    },
    /// Place an order for everything in the cart
    Checkout(commands::cart::CheckoutArgs),
    /// View and update orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Log in, sign up and log out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Show the admin dashboard
    Dashboard,
    /// Restore the seed catalog and clear cart, wishlist, orders and session
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(with_sentry: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "metamart_storefront=info,mm_cli=info".into());

    let sentry_layer =
        with_sentry.then(|| sentry_tracing::layer().event_filter(sentry_event_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_layer)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(sentry_guard.is_some());

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, config);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = Storefront::open(config)?;

    match command {
        Commands::Products { action } => commands::products::run(&mut store, action)?,
        Commands::Cart { action } => commands::cart::run(&mut store, action)?,
        Commands::Wishlist { action } => commands::wishlist::run(&mut store, action)?,
        Commands::Checkout(args) => commands::cart::checkout(&mut store, args)?,
        Commands::Orders { action } => commands::orders::run(&mut store, action)?,
        Commands::Auth { action } => commands::auth::run(&mut store, action)?,
        Commands::Dashboard => commands::orders::dashboard(&store)?,
        Commands::Reset { yes } => commands::reset(&mut store, yes)?,
    }
    Ok(())
}
