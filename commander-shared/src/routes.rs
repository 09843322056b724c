//! The dashboard's navigable routes and their access metadata.
//!
//! Both clients consult the same table: the web router maps its variants
//! onto these entries, and the CLI's `check-route` command resolves raw
//! paths through [`resolve`].

/// First-run setup page.
pub const SETUP_PATH: &str = "/setup";
/// Sign-in page; redirects carry the original target in `?redirect=`.
pub const LOGIN_PATH: &str = "/login";
/// Dashboard, where signed-in users land.
pub const HOME_PATH: &str = "/";

/// Access requirements of a route.
///
/// `auth_required` defaults to true; a route must opt out explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteMeta {
    /// Stable route name, e.g. `Users`.
    pub name: &'static str,
    /// Path pattern; segments starting with `:` match any single segment.
    pub path: &'static str,
    /// Requires a session token.
    pub auth_required: bool,
    /// Requires a loaded super-admin profile.
    pub super_admin_required: bool,
    /// The first-run setup page, the only route reachable before setup completes.
    pub is_setup_page: bool,
}

impl RouteMeta {
    /// A route behind the login.
    #[must_use]
    pub const fn protected(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            auth_required: true,
            super_admin_required: false,
            is_setup_page: false,
        }
    }

    /// A route reachable without signing in.
    #[must_use]
    pub const fn public(name: &'static str, path: &'static str) -> Self {
        Self {
            auth_required: false,
            ..Self::protected(name, path)
        }
    }

    /// A route reserved to super-admins.
    #[must_use]
    pub const fn super_admin(name: &'static str, path: &'static str) -> Self {
        Self {
            super_admin_required: true,
            ..Self::protected(name, path)
        }
    }

    /// The public first-run setup page.
    #[must_use]
    pub const fn setup(name: &'static str, path: &'static str) -> Self {
        Self {
            is_setup_page: true,
            ..Self::public(name, path)
        }
    }

    /// Whether this is the sign-in page.
    #[must_use]
    pub fn is_login_page(&self) -> bool {
        self.path == LOGIN_PATH
    }

    /// Whether a concrete path matches this route's pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(self.path);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(expected), Some(segment)) => {
                    if !expected.starts_with(':') && expected != segment {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Every route of the dashboard, in navigation order.
pub const ROUTES: &[RouteMeta] = &[
    RouteMeta::setup("Setup", SETUP_PATH),
    RouteMeta::public("Login", LOGIN_PATH),
    RouteMeta::public("ForgotPassword", "/forgot-password"),
    RouteMeta::public("ResetPassword", "/reset-password"),
    RouteMeta::protected("Dashboard", HOME_PATH),
    RouteMeta::protected("Executions", "/executions"),
    RouteMeta::protected("ExecutionDetail", "/executions/:id"),
    RouteMeta::protected("Playbooks", "/playbooks"),
    RouteMeta::protected("Inventory", "/inventory"),
    RouteMeta::protected("Terraform", "/terraform"),
    RouteMeta::protected("NetBox", "/netbox"),
    RouteMeta::super_admin("Users", "/users"),
    RouteMeta::super_admin("NotificationSettings", "/settings/notifications"),
    RouteMeta::super_admin("CloudInitSettings", "/settings/cloud-init"),
];

/// Fallback for paths outside [`ROUTES`]. Unknown paths stay behind the
/// login so they cannot be used to probe the setup state anonymously.
pub const NOT_FOUND: RouteMeta = RouteMeta::protected("NotFound", "/404");

/// Resolves a concrete path, ignoring any query string or fragment.
#[must_use]
pub fn resolve(path: &str) -> &'static RouteMeta {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    ROUTES
        .iter()
        .find(|route| route.matches(path))
        .unwrap_or(&NOT_FOUND)
}

/// Looks a route up by name, ignoring ASCII case.
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static RouteMeta> {
    ROUTES
        .iter()
        .find(|route| route.name.eq_ignore_ascii_case(name))
}
