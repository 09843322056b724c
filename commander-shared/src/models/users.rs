//! User administration payloads (`/api/users`, `/api/settings/defaults`).

use serde::{Deserialize, Serialize};

pub(crate) fn default_active() -> bool {
    true
}

/// A group assignment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAccess {
    /// Assignment row id.
    pub id: i64,
    /// Inventory group name.
    pub group_name: String,
}

/// A playbook assignment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookAccess {
    /// Assignment row id.
    pub id: i64,
    /// Playbook file name.
    pub playbook_name: String,
}

/// Short user representation used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Server-side user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Unrestricted access.
    #[serde(default)]
    pub is_super_admin: bool,
    /// Deactivated accounts cannot sign in.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Linked `NetBox` account, if any.
    #[serde(default)]
    pub netbox_user_id: Option<i64>,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Previous sign-in timestamp as sent by the server.
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Full user representation including access assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    /// The account itself.
    #[serde(flatten)]
    pub user: UserSummary,
    /// Group assignment rows.
    #[serde(default)]
    pub group_access: Vec<GroupAccess>,
    /// Playbook assignment rows.
    #[serde(default)]
    pub playbook_access: Vec<PlaybookAccess>,
    /// Group names from `group_access`.
    #[serde(default)]
    pub accessible_groups: Vec<String>,
    /// Playbook names from `playbook_access`.
    #[serde(default)]
    pub accessible_playbooks: Vec<String>,
}

/// Paged listing returned by `GET /api/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    /// Users on this page.
    pub items: Vec<UserSummary>,
    /// Matching users across all pages.
    pub total: u64,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    /// Login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Contact address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Grant unrestricted access.
    pub is_super_admin: bool,
}

/// Body of `PUT /api/users/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New contact address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New super-admin flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_super_admin: Option<bool>,
    /// Enable or disable the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /api/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Users to skip from the start.
    pub skip: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Substring to match against usernames and emails.
    pub search: Option<String>,
}

impl UserQuery {
    /// Query pairs in request order; unset and zero values are skipped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip.filter(|value| *value > 0) {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit.filter(|value| *value > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|value| !value.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Groups and playbooks granted to newly created users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAccessSettings {
    /// Groups granted on creation.
    #[serde(default)]
    pub default_groups: Vec<String>,
    /// Playbooks granted on creation.
    #[serde(default)]
    pub default_playbooks: Vec<String>,
}
