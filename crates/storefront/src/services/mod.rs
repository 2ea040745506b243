//! Operations that span more than one store.
//!
//! - `auth` - mock sign-in, sign-up and provider login
//! - `checkout` - cart validation and order placement
//! - `dashboard` - admin summary over catalog and orders

pub mod auth;
pub mod checkout;
pub mod dashboard;
