//! Signed-in user model.

use serde::{Deserialize, Serialize};

use metamart_core::{Email, UserId};

/// The signed-in user.
///
/// Produced by the mock identity provider; the stores treat it as opaque
/// apart from `is_admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub is_admin: bool,
    /// External provider (e.g. `google`) for provider logins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}
