//! Navigation guard: decides, before every route change, whether the target
//! may be shown or where to send the user instead.

use tracing::debug;

use crate::routes::{HOME_PATH, LOGIN_PATH, RouteMeta, SETUP_PATH};
use crate::session::Session;
use crate::setup_cache::SetupStatusCache;

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested route.
    Allow,
    /// Navigate to this path instead.
    Redirect(&'static str),
}

impl GuardDecision {
    /// Whether the navigation may proceed unchanged.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluates the setup gate followed by the session rules.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    setup: SetupStatusCache,
}

impl NavigationGuard {
    /// Creates a guard that consults `setup` before the session rules.
    #[must_use]
    pub fn new(setup: SetupStatusCache) -> Self {
        Self { setup }
    }

    /// The setup-status cache this guard consults.
    #[must_use]
    pub fn setup_cache(&self) -> &SetupStatusCache {
        &self.setup
    }

    /// Decides whether navigating to `target` may proceed.
    ///
    /// Until setup is complete every route except the setup page redirects
    /// there. Entering the setup page drops the cached setup status so the
    /// next navigation sees what the setup flow changed. The session rules
    /// of [`authorize`] apply after that.
    pub async fn evaluate(
        &self,
        target: &RouteMeta,
        current: Option<&RouteMeta>,
        session: &Session,
    ) -> GuardDecision {
        let decision = if target.is_setup_page {
            self.setup.invalidate();
            authorize(target, session)
        } else if self.setup.get().await {
            authorize(target, session)
        } else {
            GuardDecision::Redirect(SETUP_PATH)
        };

        debug!(
            from = current.map(|route| route.path),
            to = target.path,
            ?decision,
            "navigation checked"
        );
        decision
    }
}

/// The session-dependent part of the guard, in order: login required,
/// super-admin required, and keeping signed-in users off the login page.
///
/// A token without a loaded profile counts as signed in but not as a
/// super-admin.
#[must_use]
pub fn authorize(target: &RouteMeta, session: &Session) -> GuardDecision {
    if target.auth_required && !session.is_authenticated() {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    if target.super_admin_required && !session.is_super_admin() {
        return GuardDecision::Redirect(HOME_PATH);
    }
    if target.is_login_page() && session.is_authenticated() {
        return GuardDecision::Redirect(HOME_PATH);
    }
    GuardDecision::Allow
}
