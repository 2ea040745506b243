//! Mock authentication service.
//!
//! There is no user database: a successful login fabricates a [`User`]
//! from the submitted email. The only real check is the configured admin
//! account, whose email only signs in with the admin password.

mod error;

pub use error::AuthError;

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{instrument, warn};

use metamart_core::{Email, UserId};

use crate::error::{Result, ValidationError};
use crate::models::User;

/// The one account that signs in as an admin.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Compared case-insensitively.
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// External identity providers supported by [`AuthService::login_with_provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
}

impl Provider {
    /// Lowercase provider slug stored on the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }

    const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google User",
        }
    }

    const fn mock_email(self) -> &'static str {
        match self {
            Self::Google => "user@gmail.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AuthError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            other => Err(AuthError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    admin: &'a AdminCredentials,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(admin: &'a AdminCredentials) -> Self {
        Self { admin }
    }

    /// Sign in with email and password.
    ///
    /// The admin email with the admin password yields an admin user. Any
    /// other email yields a regular user named after the email's local part.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` for a malformed email or the admin email
    /// with a wrong password, or `StoreError::Validation` for an empty
    /// password.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = Email::parse(email).map_err(AuthError::from)?;
        require("password", password)?;

        let is_admin = email.matches(&self.admin.email);
        if is_admin && password != self.admin.password.expose_secret() {
            warn!("Rejected admin login");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(User {
            id: UserId::new(email.as_str().to_lowercase()),
            name: email.local_part().to_string(),
            email,
            is_admin,
            provider: None,
        })
    }

    /// Create a regular account. Nothing is stored beyond the session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` for a malformed email, or
    /// `StoreError::Validation` for a blank name or password.
    #[instrument(skip(self, password))]
    pub fn signup(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let email = Email::parse(email).map_err(AuthError::from)?;
        require("password", password)?;
        let name = require("name", name)?;

        Ok(User {
            id: UserId::generate(),
            email,
            name: name.to_string(),
            is_admin: false,
            provider: None,
        })
    }

    /// Sign in through an external provider (mocked).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` if the provider's account email does not
    /// parse.
    #[instrument(skip(self))]
    pub fn login_with_provider(&self, provider: Provider) -> Result<User> {
        let email = Email::parse(provider.mock_email()).map_err(AuthError::from)?;
        Ok(User {
            id: UserId::new(format!("{provider}-{}", Utc::now().timestamp_millis())),
            email,
            name: provider.display_name().to_string(),
            is_admin: false,
            provider: Some(provider.as_str().to_string()),
        })
    }
}

fn require<'v>(field: &'static str, value: &'v str) -> std::result::Result<&'v str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed)
}
