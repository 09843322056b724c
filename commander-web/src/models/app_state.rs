use shared::Session;
use shared::session::ThemePreferences;
use yewdux::Store;

/// Render-side mirror of the session store, kept current by a session
/// listener installed in [`crate::app::App`].
#[derive(Debug, Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub session: Session,
    /// Appearance applied to the document: the profile's preferences once
    /// loaded, otherwise whatever the previous visit cached.
    pub appearance: ThemePreferences,
    /// Set once the persisted session has been restored and, if a token was
    /// found, the profile fetch has finished.
    pub ready: bool,
}

impl AppState {
    pub fn from_session(session: Session, cached: ThemePreferences) -> Self {
        let appearance = session
            .profile()
            .map_or(cached, |profile| profile.preferences.clone());
        Self {
            session,
            appearance,
            ready: false,
        }
    }
}
