//! Shared building blocks for the Proxmox Commander clients.
//!
//! The web dashboard and the operator CLI both gate navigation on the same
//! two facts: whether first-run setup has been completed on the server, and
//! whether the local session holds a credential. This crate owns those
//! facts ([`setup_cache`], [`session`]), the decision procedure built on top
//! of them ([`guard`], [`routes`]) and the HTTP plumbing they talk through
//! ([`api`]).

pub mod api;
pub mod config;
pub mod guard;
pub mod models;
pub mod routes;
pub mod session;
pub mod setup_cache;
pub mod storage;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use guard::{GuardDecision, NavigationGuard};
pub use routes::RouteMeta;
pub use session::{Session, SessionError, SessionStore};
pub use setup_cache::SetupStatusCache;
pub use users::{UsersError, UsersStore};
