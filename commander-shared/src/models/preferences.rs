//! Appearance settings stored per user.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Theme applied when neither the server nor local storage knows better.
pub const DEFAULT_THEME: &str = "blue";

/// Colour themes offered by the dashboard.
pub const KNOWN_THEMES: [&str; 5] = ["blue", "orange", "green", "purple", "teal"];

/// Light/dark rendering preference.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DarkMode {
    /// Always light.
    Light,
    /// Always dark.
    #[default]
    Dark,
    /// Follow the operating system's colour scheme.
    System,
}

/// Which logo variant the sidebar shows.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SidebarLogo {
    /// Compact square icon.
    #[default]
    Icon,
    /// Full-width banner.
    Banner,
}

/// Body of `GET /api/auth/me/preferences`.
///
/// Every field is optional on the wire so that older backends, which only know
/// about `theme`, still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Stored accent color.
    #[serde(default)]
    pub theme: Option<String>,
    /// Stored dark mode.
    #[serde(default)]
    pub dark_mode: Option<DarkMode>,
    /// Stored sidebar logo style.
    #[serde(default)]
    pub sidebar_logo: Option<SidebarLogo>,
}

/// Partial update sent with `PATCH /api/auth/me/preferences`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    /// New accent color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// New dark mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<DarkMode>,
    /// New sidebar logo style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_logo: Option<SidebarLogo>,
}

impl PreferencesUpdate {
    /// Update that only changes the theme.
    #[must_use]
    pub fn theme(theme: impl Into<String>) -> Self {
        Self {
            theme: Some(theme.into()),
            ..Self::default()
        }
    }

    /// True when no field would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.dark_mode.is_none() && self.sidebar_logo.is_none()
    }
}
