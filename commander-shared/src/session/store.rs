use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    str::FromStr,
};

use tracing::{debug, info, warn};

use super::{Profile, Session, SessionError, ThemePreferences};
use crate::api::{ApiError, AuthApi, ErrorInterceptor};
use crate::models::{
    AccessSummary, ChangePasswordRequest, DarkMode, MessageResponse, PreferencesUpdate,
    UserSummary,
};
use crate::storage::{DARK_MODE_KEY, KeyValueStore, SIDEBAR_LOGO_KEY, THEME_KEY, TOKEN_KEY};
use crate::validation::{ValidationError, validate_confirm_password, validate_password};

/// Callback invoked with the new session after every change.
pub type SessionListener = Rc<dyn Fn(&Session)>;

struct Shared {
    session: RefCell<Session>,
    listeners: RefCell<Vec<SessionListener>>,
}

/// Owns the [`Session`] and every operation that changes it.
///
/// Clones share the same session. Borrows are never held across an `await`,
/// so concurrent operations on one thread interleave safely; the last write
/// wins.
#[derive(Clone)]
pub struct SessionStore {
    api: Rc<dyn AuthApi>,
    storage: Rc<dyn KeyValueStore>,
    shared: Rc<Shared>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.shared.session.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field(
                "username",
                &session.profile().map(|profile| profile.username.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty store. Call [`SessionStore::restore`] to pick up a
    /// persisted token.
    #[must_use]
    pub fn new(api: Rc<dyn AuthApi>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            shared: Rc::new(Shared {
                session: RefCell::new(Session::anonymous()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Loads the persisted token, if any, without contacting the backend.
    /// Returns whether a token was found.
    #[allow(clippy::must_use_candidate)]
    pub fn restore(&self) -> bool {
        let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) else {
            return false;
        };
        debug!("restored persisted session token");
        self.api.set_bearer_token(Some(token.clone()));
        self.mutate(|session| {
            session.set_token(token);
            true
        });
        true
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.shared.session.borrow().clone()
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.shared.session.borrow().token().map(str::to_string)
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.shared.session.borrow().is_authenticated()
    }

    /// Registers a listener called after every session change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.shared.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Appearance settings cached locally by a previous session, used to
    /// paint the UI before the profile arrives.
    #[must_use]
    pub fn persisted_preferences(&self) -> ThemePreferences {
        let defaults = ThemePreferences::default();
        ThemePreferences {
            theme: self.storage.get(THEME_KEY).unwrap_or(defaults.theme),
            dark_mode: self.parse_stored(DARK_MODE_KEY).unwrap_or(defaults.dark_mode),
            sidebar_logo: self
                .parse_stored(SIDEBAR_LOGO_KEY)
                .unwrap_or(defaults.sidebar_logo),
        }
    }

    /// Exchanges credentials for a token, persists it and loads the profile.
    ///
    /// # Errors
    /// [`SessionError::InvalidCredentials`] when the backend answers with an
    /// error status; the session is left empty. Transport failures surface
    /// as [`SessionError::Api`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Profile, SessionError> {
        let token = match self.api.login(username, password).await {
            Ok(token) => token.access_token,
            Err(error) => {
                warn!(username, error = %error, "login rejected");
                self.clear();
                return Err(match error {
                    ApiError::NetworkUnreachable(_) | ApiError::Decode(_) => {
                        SessionError::Api(error)
                    }
                    other => SessionError::InvalidCredentials(other),
                });
            }
        };

        self.storage.set(TOKEN_KEY, &token);
        self.api.set_bearer_token(Some(token.clone()));
        self.mutate(|session| {
            session.set_token(token);
            true
        });
        info!(username, "signed in");

        self.fetch_profile()
            .await?
            .ok_or(SessionError::NotAuthenticated)
    }

    /// Loads the signed-in user's profile and appearance settings.
    ///
    /// Returns `Ok(None)` without any request when no token is held. When
    /// the preferences endpoint fails the profile is still populated, using
    /// the account theme, dark mode and the locally cached sidebar logo.
    ///
    /// # Errors
    /// If the user lookup itself fails the error is returned and the session
    /// is logged out, unless the token changed while the lookup was running.
    pub async fn fetch_profile(&self) -> Result<Option<Profile>, SessionError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        self.api.set_bearer_token(Some(token.clone()));

        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(error) => {
                // Only the token that was rejected is signed out.
                if self.token().as_deref() == Some(token.as_str()) {
                    warn!(error = %error, "could not load current user, signing out");
                    self.logout();
                } else {
                    debug!(error = %error, "user lookup failed for a replaced session token");
                }
                return Err(error.into());
            }
        };

        let persisted = self.persisted_preferences();
        let preferences = match self.api.preferences().await {
            Ok(remote) => ThemePreferences {
                theme: remote.theme.unwrap_or_else(|| user.theme.clone()),
                dark_mode: remote.dark_mode.unwrap_or(DarkMode::Dark),
                sidebar_logo: remote.sidebar_logo.unwrap_or(persisted.sidebar_logo),
            },
            Err(error) => {
                warn!(error = %error, "preferences unavailable, using account defaults");
                ThemePreferences {
                    theme: user.theme.clone(),
                    dark_mode: DarkMode::Dark,
                    sidebar_logo: persisted.sidebar_logo,
                }
            }
        };

        // A logout or re-login while the requests were outstanding wins.
        if self.token().as_deref() != Some(token.as_str()) {
            debug!("session changed while loading profile, discarding result");
            return Ok(None);
        }

        self.persist_preferences(&preferences);
        let profile = Profile::from_user(user, preferences);
        debug!(username = %profile.username, super_admin = profile.is_super_admin, "profile loaded");
        self.mutate(|session| {
            session.set_profile(profile.clone());
            true
        });
        Ok(Some(profile))
    }

    /// Loads the permission overview and attaches it to the profile.
    ///
    /// # Errors
    /// Propagates backend failures; the session is not cleared for them.
    pub async fn fetch_access_summary(&self) -> Result<Option<AccessSummary>, SessionError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        let summary = self.api.access_summary().await.inspect_err(|error| {
            warn!(error = %error, "access summary unavailable");
        })?;
        self.mutate(|session| match session.profile_mut() {
            Some(profile) => {
                profile.access = Some(summary.clone());
                true
            }
            None => false,
        });
        Ok(Some(summary))
    }

    /// Sends a partial preference update and applies the fields that were
    /// part of it, using the values the server echoed back.
    ///
    /// # Errors
    /// [`SessionError::NotAuthenticated`] without a loaded profile, or the
    /// backend error. Nothing is changed locally on failure.
    pub async fn update_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<Profile, SessionError> {
        let current = self
            .session()
            .profile()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;
        if update.is_empty() {
            return Ok(current);
        }

        debug!(?update, "updating preferences");
        let echoed = self.api.update_preferences(&update).await?;

        let theme = update
            .theme
            .map(|requested| echoed.theme.clone().unwrap_or(requested));
        let dark_mode = update
            .dark_mode
            .map(|requested| echoed.dark_mode.unwrap_or(requested));
        let sidebar_logo = update
            .sidebar_logo
            .map(|requested| echoed.sidebar_logo.unwrap_or(requested));

        if let Some(theme) = &theme {
            self.storage.set(THEME_KEY, theme);
        }
        if let Some(mode) = dark_mode {
            self.storage.set(DARK_MODE_KEY, mode.as_ref());
        }
        if let Some(logo) = sidebar_logo {
            self.storage.set(SIDEBAR_LOGO_KEY, logo.as_ref());
        }

        let mut updated = None;
        self.mutate(|session| match session.profile_mut() {
            Some(profile) => {
                if let Some(theme) = theme {
                    profile.preferences.theme = theme;
                }
                if let Some(mode) = dark_mode {
                    profile.preferences.dark_mode = mode;
                }
                if let Some(logo) = sidebar_logo {
                    profile.preferences.sidebar_logo = logo;
                }
                updated = Some(profile.clone());
                true
            }
            None => false,
        });
        updated.ok_or(SessionError::NotAuthenticated)
    }

    /// Changes the signed-in user's password. The session itself is untouched.
    ///
    /// # Errors
    /// [`SessionError::Validation`] before any request for a blank current
    /// password, a too-short new password or a mismatched confirmation;
    /// otherwise the backend error.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
        sync_to_netbox: bool,
    ) -> Result<MessageResponse, SessionError> {
        if current_password.is_empty() {
            return Err(ValidationError::Required.into());
        }
        validate_password(new_password)?;
        validate_confirm_password(confirm_password, new_password)?;
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }

        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
            sync_to_netbox,
        };
        let response = self.api.change_password(&request).await?;
        info!(sync_to_netbox, "password changed");
        Ok(response)
    }

    /// Creates the bootstrap administrator on a fresh installation.
    ///
    /// # Errors
    /// Returns the backend error, e.g. when users already exist.
    pub async fn init_admin(&self) -> Result<UserSummary, SessionError> {
        let admin = self.api.init_admin().await?;
        info!(username = %admin.username, "bootstrap administrator created");
        Ok(admin)
    }

    /// Clears token, profile and the persisted token. Idempotent.
    pub fn logout(&self) {
        if self.clear() {
            info!("signed out");
        }
    }

    /// Interceptor that signs out whenever the backend answers `401`.
    ///
    /// It holds the store weakly so registering it on the transport does not
    /// keep the session alive.
    #[must_use]
    pub fn unauthorized_interceptor(&self) -> Rc<dyn ErrorInterceptor> {
        let store = WeakStore {
            api: Rc::downgrade(&self.api),
            storage: Rc::downgrade(&self.storage),
            shared: Rc::downgrade(&self.shared),
        };
        Rc::new(move |error: &ApiError| {
            if error.is_unauthorized()
                && let Some(store) = store.upgrade()
                && store.is_authenticated()
            {
                warn!("backend rejected the session token, signing out");
                store.logout();
            }
        })
    }

    fn clear(&self) -> bool {
        self.storage.remove(TOKEN_KEY);
        self.api.set_bearer_token(None);
        self.mutate(Session::clear)
    }

    fn persist_preferences(&self, preferences: &ThemePreferences) {
        self.storage.set(THEME_KEY, &preferences.theme);
        self.storage.set(DARK_MODE_KEY, preferences.dark_mode.as_ref());
        self.storage.set(SIDEBAR_LOGO_KEY, preferences.sidebar_logo.as_ref());
    }

    fn parse_stored<T: FromStr>(&self, key: &str) -> Option<T> {
        self.storage.get(key).and_then(|raw| raw.parse().ok())
    }

    /// Applies `change` and notifies listeners when it reports a change.
    fn mutate(&self, change: impl FnOnce(&mut Session) -> bool) -> bool {
        let snapshot = {
            let mut session = self.shared.session.borrow_mut();
            if !change(&mut session) {
                return false;
            }
            session.clone()
        };
        let listeners = self.shared.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
        true
    }
}

struct WeakStore {
    api: Weak<dyn AuthApi>,
    storage: Weak<dyn KeyValueStore>,
    shared: Weak<Shared>,
}

impl WeakStore {
    fn upgrade(&self) -> Option<SessionStore> {
        Some(SessionStore {
            api: self.api.upgrade()?,
            storage: self.storage.upgrade()?,
            shared: self.shared.upgrade()?,
        })
    }
}
