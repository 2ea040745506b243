//! Session commands.
//!
//! ```bash
//! mm-cli auth login -e admin@gmail.com -p admin
//! mm-cli auth signup -e asha@example.com -p hunter22 -n "Asha Rao"
//! mm-cli auth provider google
//! mm-cli auth whoami
//! mm-cli auth logout
//! ```

use clap::Subcommand;
use secrecy::{ExposeSecret, SecretString};

use metamart_storefront::Storefront;
use metamart_storefront::models::User;
use metamart_storefront::services::auth::Provider;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        name: String,
    },
    /// Log in through an external provider (e.g. google)
    Provider { provider: String },
    /// Show the signed-in user
    Whoami,
    /// Log out
    Logout,
}

/// Run an auth subcommand.
///
/// # Errors
///
/// Returns store errors (invalid email, wrong admin password).
pub fn run(store: &mut Storefront, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { email, password } => {
            let password = SecretString::from(password);
            let user = store.login(&email, password.expose_secret())?;
            greet(&user);
        }
        AuthAction::Signup {
            email,
            password,
            name,
        } => {
            let password = SecretString::from(password);
            let user = store.signup(&email, password.expose_secret(), &name)?;
            greet(&user);
        }
        AuthAction::Provider { provider } => {
            let provider: Provider = provider.parse()?;
            let user = store.login_with_provider(provider)?;
            greet(&user);
        }
        AuthAction::Whoami => match store.current_user() {
            Some(user) => greet(user),
            None => println!("Not logged in."),
        },
        AuthAction::Logout => {
            store.logout()?;
            println!("Logged out.");
        }
    }
    Ok(())
}

fn greet(user: &User) {
    let role = if user.is_admin { " (admin)" } else { "" };
    println!("Logged in as {} <{}>{role}", user.name, user.email);
}
