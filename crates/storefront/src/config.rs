//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `METAMART_DATA_DIR` - Directory holding the JSON documents (default: `.metamart`)
//! - `METAMART_LOW_STOCK_THRESHOLD` - Dashboard low-stock cut-off (default: 10)
//! - `METAMART_ADMIN_EMAIL` - Email that signs in as admin (default: `admin@gmail.com`)
//! - `METAMART_ADMIN_PASSWORD` - Password for the admin email (default: `admin`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use metamart_core::Email;

use crate::services::auth::AdminCredentials;

const DEFAULT_DATA_DIR: &str = ".metamart";
const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;
const DEFAULT_ADMIN_EMAIL: &str = "admin@gmail.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
///
/// `Debug` output redacts the admin password.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for file storage
    pub data_dir: PathBuf,
    /// Products at or below this stock count as low stock
    pub low_stock_threshold: u32,
    /// The admin account
    pub admin: AdminCredentials,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            admin: AdminCredentials {
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let data_dir = get("METAMART_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let low_stock_threshold = match get("METAMART_LOW_STOCK_THRESHOLD") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar("METAMART_LOW_STOCK_THRESHOLD".to_string(), e.to_string())
            })?,
            None => defaults.low_stock_threshold,
        };

        let email = match get("METAMART_ADMIN_EMAIL") {
            Some(raw) => Email::parse(&raw)
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("METAMART_ADMIN_EMAIL".to_string(), e.to_string())
                })?
                .into_inner(),
            None => defaults.admin.email,
        };
        let password = get("METAMART_ADMIN_PASSWORD")
            .map_or(defaults.admin.password, SecretString::from);

        Ok(Self {
            data_dir,
            low_stock_threshold,
            admin: AdminCredentials { email, password },
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".metamart"));
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.admin.email, "admin@gmail.com");
        assert_eq!(config.admin.password.expose_secret(), "admin");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("METAMART_DATA_DIR", "/tmp/mm"),
            ("METAMART_LOW_STOCK_THRESHOLD", " 3 "),
            ("METAMART_ADMIN_EMAIL", "ops@metamart.in"),
            ("METAMART_ADMIN_PASSWORD", "hunter22"),
            ("SENTRY_DSN", ""),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mm"));
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.admin.email, "ops@metamart.in");
        assert_eq!(config.admin.password.expose_secret(), "hunter22");
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_values() {
        let err = StorefrontConfig::from_lookup(lookup(&[("METAMART_LOW_STOCK_THRESHOLD", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "METAMART_LOW_STOCK_THRESHOLD"));

        let err =
            StorefrontConfig::from_lookup(lookup(&[("METAMART_ADMIN_EMAIL", "nobody")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = StorefrontConfig::from_lookup(lookup(&[("METAMART_ADMIN_PASSWORD", "s3cr3t-pw")]))
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t-pw"));
        assert!(debug.contains("[REDACTED]"));
    }
}
