//! Backend collaborators.
//!
//! Each group of endpoints is a trait so the session, the setup cache and the
//! users store can be driven by test doubles. [`HttpClient`] implements all
//! of them over `reqwest`. Futures are not `Send`: the clients run on a
//! single-threaded executor (the browser event loop or a current-thread
//! tokio runtime).

mod client;
mod error;
mod interceptor;

use std::{cell::RefCell, rc::Rc};

use async_trait::async_trait;

use crate::models::{
    AccessSummary, ChangePasswordRequest, DefaultAccessSettings, GroupAccess, MessageResponse,
    PlaybookAccess, Preferences, PreferencesUpdate, SetupStatus, TokenResponse, UserCreate,
    UserDetail, UserListResponse, UserQuery, UserRecord, UserSummary, UserUpdate,
};

pub use client::HttpClient;
pub use error::ApiError;
pub use interceptor::ErrorInterceptor;

/// Interceptors registered on one transport, notified in order.
pub(crate) type Interceptors = RefCell<Vec<Rc<dyn ErrorInterceptor>>>;

/// `GET /api/setup/status`.
#[async_trait(?Send)]
pub trait SetupApi {
    /// Reports whether first-run setup is complete and what is missing.
    async fn setup_status(&self) -> Result<SetupStatus, ApiError>;
}

/// Authentication and own-account endpoints under `/api/auth`.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Sets or clears the bearer token attached to subsequent requests.
    fn set_bearer_token(&self, token: Option<String>);

    /// Exchanges credentials for an access token (form-encoded body).
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;

    /// `GET /api/auth/me`: the account behind the bearer token.
    async fn current_user(&self) -> Result<UserRecord, ApiError>;

    /// `GET /api/auth/me/access`: effective permissions of the account.
    async fn access_summary(&self) -> Result<AccessSummary, ApiError>;

    /// `GET /api/auth/me/preferences`; fields the user never set are absent.
    async fn preferences(&self) -> Result<Preferences, ApiError>;

    /// `PATCH /api/auth/me/preferences`; returns the stored values.
    async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<Preferences, ApiError>;

    /// `POST /api/auth/change-password`, optionally mirrored to `NetBox`.
    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// Creates the bootstrap super-admin; only succeeds while no user exists.
    async fn init_admin(&self) -> Result<UserSummary, ApiError>;
}

/// User administration endpoints (super-admin only on the server side).
#[async_trait(?Send)]
pub trait UsersApi {
    /// One page of users matching `query`.
    async fn list_users(&self, query: &UserQuery) -> Result<UserListResponse, ApiError>;

    /// A user together with their group and playbook grants.
    async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError>;

    /// Creates an account.
    async fn create_user(&self, user: &UserCreate) -> Result<UserDetail, ApiError>;

    /// Applies a partial account update.
    async fn update_user(&self, user_id: i64, update: &UserUpdate)
    -> Result<UserDetail, ApiError>;

    /// Deletes an account.
    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError>;

    /// Sets a new password without knowing the old one.
    async fn reset_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError>;

    /// Replaces the user's group grants.
    async fn set_user_groups(
        &self,
        user_id: i64,
        groups: &[String],
    ) -> Result<Vec<GroupAccess>, ApiError>;

    /// Grants one group.
    async fn add_user_group(&self, user_id: i64, group: &str) -> Result<GroupAccess, ApiError>;

    /// Revokes one group.
    async fn remove_user_group(&self, user_id: i64, group: &str) -> Result<(), ApiError>;

    /// Replaces the user's playbook grants.
    async fn set_user_playbooks(
        &self,
        user_id: i64,
        playbooks: &[String],
    ) -> Result<Vec<PlaybookAccess>, ApiError>;

    /// Grants one playbook.
    async fn add_user_playbook(
        &self,
        user_id: i64,
        playbook: &str,
    ) -> Result<PlaybookAccess, ApiError>;

    /// Revokes one playbook.
    async fn remove_user_playbook(&self, user_id: i64, playbook: &str) -> Result<(), ApiError>;

    /// Grants given to newly created users.
    async fn default_access(&self) -> Result<DefaultAccessSettings, ApiError>;

    /// Replaces the grants given to newly created users.
    async fn set_default_access(
        &self,
        defaults: &DefaultAccessSettings,
    ) -> Result<DefaultAccessSettings, ApiError>;
}
