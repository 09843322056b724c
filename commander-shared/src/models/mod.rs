//! Wire models exchanged with the Proxmox Commander backend.

pub mod auth;
pub mod errors;
pub mod preferences;
pub mod setup;
pub mod users;

pub use auth::{AccessSummary, ChangePasswordRequest, MessageResponse, TokenResponse, UserRecord};
pub use errors::ErrorBody;
pub use preferences::{
    DEFAULT_THEME, DarkMode, KNOWN_THEMES, Preferences, PreferencesUpdate, SidebarLogo,
};
pub use setup::SetupStatus;
pub use users::{
    DefaultAccessSettings, GroupAccess, PlaybookAccess, UserCreate, UserDetail,
    UserListResponse, UserQuery, UserSummary, UserUpdate,
};
