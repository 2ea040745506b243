//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] metamart_core::EmailError),

    /// The admin email was used with the wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unknown identity provider name.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
}
