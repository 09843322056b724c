use std::collections::BTreeSet;

use crate::models::{AccessSummary, DEFAULT_THEME, DarkMode, SidebarLogo, UserRecord};

/// Appearance settings, whether loaded from the server or from local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreferences {
    /// Accent color name, e.g. `blue` or `teal`.
    pub theme: String,
    /// Light, dark or follow the operating system.
    pub dark_mode: DarkMode,
    /// Icon or banner logo in the sidebar.
    pub sidebar_logo: SidebarLogo,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            dark_mode: DarkMode::default(),
            sidebar_logo: SidebarLogo::default(),
        }
    }
}

/// The signed-in user as the clients see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Server-side user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address, when one is on record.
    pub email: Option<String>,
    /// Unrestricted access, including user and settings administration.
    pub is_super_admin: bool,
    /// Inventory groups granted to this user.
    pub accessible_groups: BTreeSet<String>,
    /// Playbooks granted to this user.
    pub accessible_playbooks: BTreeSet<String>,
    /// Appearance settings in effect for this user.
    pub preferences: ThemePreferences,
    /// Filled in by a separate access-summary request.
    pub access: Option<AccessSummary>,
}

impl Profile {
    /// Builds a profile from the `/api/auth/me` record and the resolved
    /// appearance settings.
    #[must_use]
    pub fn from_user(user: UserRecord, preferences: ThemePreferences) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_super_admin: user.is_super_admin,
            accessible_groups: user.accessible_groups.into_iter().collect(),
            accessible_playbooks: user.accessible_playbooks.into_iter().collect(),
            preferences,
            access: None,
        }
    }
}

/// Client-side authentication state.
///
/// A profile is only ever present together with a token; the constructors
/// and the session store keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    profile: Option<Profile>,
}

impl Session {
    /// No token and no profile.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session holding `token` and, once loaded, the user's profile.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, profile: Option<Profile>) -> Self {
        Self {
            token: Some(token.into()),
            profile,
        }
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The loaded profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// True when a token is held, even if the profile is not loaded yet.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Requires a loaded profile with the super-admin flag.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.is_super_admin)
    }

    /// Whether the users page and its operations are available.
    #[must_use]
    pub fn can_manage_users(&self) -> bool {
        self.is_super_admin()
    }

    /// Whether the settings pages are available.
    #[must_use]
    pub fn can_manage_settings(&self) -> bool {
        self.is_super_admin()
    }

    /// Whether `group` may be used. Super-admins reach every group.
    #[must_use]
    pub fn can_access_group(&self, group: &str) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|p| p.is_super_admin || p.accessible_groups.contains(group))
    }

    /// Whether `playbook` may be run. Super-admins reach every playbook.
    #[must_use]
    pub fn can_access_playbook(&self, playbook: &str) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|p| p.is_super_admin || p.accessible_playbooks.contains(playbook))
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
        self.profile = None;
    }

    /// Attaches a profile; ignored without a token.
    pub(crate) fn set_profile(&mut self, profile: Profile) {
        if self.token.is_some() {
            self.profile = Some(profile);
        }
    }

    pub(crate) fn profile_mut(&mut self) -> Option<&mut Profile> {
        self.profile.as_mut()
    }

    /// Drops token and profile; returns whether anything was held.
    pub(crate) fn clear(&mut self) -> bool {
        let had_state = self.token.is_some() || self.profile.is_some();
        self.token = None;
        self.profile = None;
        had_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user_record;

    fn session_for(super_admin: bool) -> Session {
        let profile = Profile::from_user(
            user_record(7, "operator", super_admin),
            ThemePreferences::default(),
        );
        Session::authenticated("abc", Some(profile))
    }

    #[test]
    fn anonymous_session_has_no_rights() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.is_super_admin());
        assert!(!session.can_access_group("webservers"));
    }

    #[test]
    fn token_without_profile_is_authenticated_but_not_admin() {
        let session = Session::authenticated("abc", None);
        assert!(session.is_authenticated());
        assert!(!session.is_super_admin());
        assert!(!session.can_manage_users());
    }

    #[test]
    fn regular_user_sees_only_granted_resources() {
        let session = session_for(false);
        assert!(session.can_access_group("webservers"));
        assert!(!session.can_access_group("databases"));
        assert!(session.can_access_playbook("deploy-nginx"));
        assert!(!session.can_access_playbook("wipe-disks"));
        assert!(!session.can_manage_settings());
    }

    #[test]
    fn super_admin_sees_everything() {
        let session = session_for(true);
        assert!(session.can_access_group("databases"));
        assert!(session.can_access_playbook("wipe-disks"));
        assert!(session.can_manage_users());
        assert!(session.can_manage_settings());
    }

    #[test]
    fn profile_requires_token() {
        let mut session = Session::anonymous();
        session.set_profile(Profile::from_user(
            user_record(1, "admin", true),
            ThemePreferences::default(),
        ));
        assert!(session.profile().is_none());
    }

    #[test]
    fn new_token_drops_stale_profile() {
        let mut session = session_for(true);
        session.set_token("fresh".to_string());
        assert_eq!(session.token(), Some("fresh"));
        assert!(session.profile().is_none());
        assert!(session.clear());
        assert!(!session.clear());
    }
}
