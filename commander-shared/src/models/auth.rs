//! Sign-in, own-account and access payloads under `/api/auth`.

use serde::{Deserialize, Serialize};

use super::preferences::DEFAULT_THEME;

fn default_token_type() -> String {
    "bearer".to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Always `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// The authenticated user as returned by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-side user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Legacy admin flag; navigation only looks at `is_super_admin`.
    #[serde(default)]
    pub is_admin: bool,
    /// Unrestricted access.
    #[serde(default)]
    pub is_super_admin: bool,
    /// Deactivated accounts cannot sign in.
    #[serde(default = "crate::models::users::default_active")]
    pub is_active: bool,
    /// Account theme, used when no preference has been stored.
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Inventory groups granted to the user.
    #[serde(default)]
    pub accessible_groups: Vec<String>,
    /// Playbooks granted to the user.
    #[serde(default)]
    pub accessible_playbooks: Vec<String>,
    /// ISO-8601 timestamp as sent by the server; kept verbatim since it may lack an offset.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Timestamp of the previous sign-in, same format as `created_at`.
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Permission overview returned by `GET /api/auth/me/access`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSummary {
    /// Unrestricted access.
    pub is_super_admin: bool,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Effective inventory groups.
    #[serde(default)]
    pub accessible_groups: Vec<String>,
    /// Effective playbooks.
    #[serde(default)]
    pub accessible_playbooks: Vec<String>,
    /// Whether the users page may be used.
    pub can_manage_users: bool,
}

/// Body of `POST /api/auth/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Password being replaced.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
    /// Repeat of `new_password`.
    pub confirm_password: String,
    /// Also push the new password to the `NetBox` account of the same user.
    pub sync_to_netbox: bool,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: String,
}
