//! First-run setup status.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/setup/status`.
///
/// Only `setup_complete` drives navigation; the remaining fields describe what
/// the setup wizard still has to collect and default to empty when an older
/// backend omits them.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupStatus {
    /// Whether the installation is usable.
    pub setup_complete: bool,
    /// Proxmox host and API token are configured.
    #[serde(default)]
    pub has_proxmox_config: bool,
    /// The backend's signing key exists.
    #[serde(default)]
    pub has_secret_key: bool,
    /// An SSH key for Ansible runs exists.
    #[serde(default)]
    pub has_ssh_key: bool,
    /// Names of the items still missing.
    #[serde(default)]
    pub missing_items: Vec<String>,
}
