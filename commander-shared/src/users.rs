//! # Users store
//!
//! Client-side view of the user administration endpoints: the current page
//! of users, the user being edited, and the access-assignment operations.

use std::{cell::RefCell, fmt, rc::Rc};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiError, UsersApi};
use crate::models::{
    DefaultAccessSettings, GroupAccess, MessageResponse, PlaybookAccess, UserCreate, UserDetail,
    UserListResponse, UserQuery, UserSummary, UserUpdate,
};
use crate::validation::{ValidationError, validate_password, validate_username};

/// Errors surfaced by [`UsersStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsersError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Observable state of the users store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    /// The most recently loaded page.
    pub users: Vec<UserSummary>,
    /// Number of users matching the last query across all pages.
    pub total: u64,
    /// A listing or detail request is outstanding.
    pub loading: bool,
    /// The user opened for editing.
    pub current_user: Option<UserDetail>,
}

struct Inner {
    state: UsersState,
    /// Reused when a mutation refreshes the listing.
    last_query: UserQuery,
}

/// Clears `loading` when dropped, so every exit path resets it.
struct LoadingGuard<'a>(&'a RefCell<Inner>);

impl<'a> LoadingGuard<'a> {
    fn start(inner: &'a RefCell<Inner>) -> Self {
        inner.borrow_mut().state.loading = true;
        Self(inner)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().state.loading = false;
    }
}

/// Users page state plus the administration operations; clones share state.
#[derive(Clone)]
pub struct UsersStore {
    api: Rc<dyn UsersApi>,
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for UsersStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersStore")
            .field("state", &self.inner.borrow().state)
            .finish_non_exhaustive()
    }
}

impl UsersStore {
    /// Creates an empty store talking to `api`.
    #[must_use]
    pub fn new(api: Rc<dyn UsersApi>) -> Self {
        Self {
            api,
            inner: Rc::new(RefCell::new(Inner {
                state: UsersState::default(),
                last_query: UserQuery::default(),
            })),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> UsersState {
        self.inner.borrow().state.clone()
    }

    /// Whether a listing or detail request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.borrow().state.loading
    }

    /// Loaded users that are not deactivated.
    #[must_use]
    pub fn active_users(&self) -> Vec<UserSummary> {
        self.filtered(|user| user.is_active)
    }

    /// Loaded users with the super-admin flag.
    #[must_use]
    pub fn super_admins(&self) -> Vec<UserSummary> {
        self.filtered(|user| user.is_super_admin)
    }

    fn filtered(&self, keep: impl Fn(&UserSummary) -> bool) -> Vec<UserSummary> {
        self.inner
            .borrow()
            .state
            .users
            .iter()
            .filter(|user| keep(user))
            .cloned()
            .collect()
    }

    /// Loads a page of users and remembers the query for later refreshes.
    ///
    /// # Errors
    /// Returns the backend error; the previous listing is kept.
    pub async fn fetch_users(&self, query: UserQuery) -> Result<UserListResponse, UsersError> {
        let _loading = LoadingGuard::start(&self.inner);
        let page = self.api.list_users(&query).await?;
        debug!(count = page.items.len(), total = page.total, "users loaded");
        let mut inner = self.inner.borrow_mut();
        inner.state.users.clone_from(&page.items);
        inner.state.total = page.total;
        inner.last_query = query;
        drop(inner);
        Ok(page)
    }

    /// Loads one user with their grants and opens it for editing.
    ///
    /// # Errors
    /// Returns the backend error, e.g. `404` for an unknown id.
    pub async fn fetch_user(&self, user_id: i64) -> Result<UserDetail, UsersError> {
        let _loading = LoadingGuard::start(&self.inner);
        let detail = self.api.get_user(user_id).await?;
        self.inner.borrow_mut().state.current_user = Some(detail.clone());
        Ok(detail)
    }

    /// Creates a user and refreshes the listing.
    ///
    /// # Errors
    /// Validation errors for the username or password, otherwise the backend
    /// error.
    pub async fn create_user(&self, user: &UserCreate) -> Result<UserDetail, UsersError> {
        validate_username(&user.username)?;
        validate_password(&user.password)?;
        let created = self.api.create_user(user).await?;
        info!(username = %created.user.username, "user created");
        self.refresh().await?;
        Ok(created)
    }

    /// Updates a user and refreshes the listing.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
    ) -> Result<UserDetail, UsersError> {
        let updated = self.api.update_user(user_id, update).await?;
        info!(user_id, "user updated");
        self.refresh().await?;
        Ok(updated)
    }

    /// Deletes a user, closing it if it was open, and refreshes the listing.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), UsersError> {
        self.api.delete_user(user_id).await?;
        info!(user_id, "user deleted");
        {
            let mut inner = self.inner.borrow_mut();
            if inner
                .state
                .current_user
                .as_ref()
                .is_some_and(|detail| detail.user.id == user_id)
            {
                inner.state.current_user = None;
            }
        }
        self.refresh().await?;
        Ok(())
    }

    /// Sets a new password for another user.
    ///
    /// # Errors
    /// [`ValidationError::PasswordTooShort`] before any request, otherwise
    /// the backend error.
    pub async fn reset_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> Result<MessageResponse, UsersError> {
        validate_password(new_password)?;
        Ok(self.api.reset_password(user_id, new_password).await?)
    }

    /// Replaces the user's group assignments.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn set_user_groups(
        &self,
        user_id: i64,
        groups: &[String],
    ) -> Result<Vec<GroupAccess>, UsersError> {
        Ok(self.api.set_user_groups(user_id, groups).await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn add_user_group(
        &self,
        user_id: i64,
        group: &str,
    ) -> Result<GroupAccess, UsersError> {
        Ok(self.api.add_user_group(user_id, group).await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn remove_user_group(&self, user_id: i64, group: &str) -> Result<(), UsersError> {
        Ok(self.api.remove_user_group(user_id, group).await?)
    }

    /// Replaces the user's playbook assignments.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn set_user_playbooks(
        &self,
        user_id: i64,
        playbooks: &[String],
    ) -> Result<Vec<PlaybookAccess>, UsersError> {
        Ok(self.api.set_user_playbooks(user_id, playbooks).await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn add_user_playbook(
        &self,
        user_id: i64,
        playbook: &str,
    ) -> Result<PlaybookAccess, UsersError> {
        Ok(self.api.add_user_playbook(user_id, playbook).await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn remove_user_playbook(
        &self,
        user_id: i64,
        playbook: &str,
    ) -> Result<(), UsersError> {
        Ok(self.api.remove_user_playbook(user_id, playbook).await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn fetch_default_access(&self) -> Result<DefaultAccessSettings, UsersError> {
        Ok(self.api.default_access().await?)
    }

    /// # Errors
    /// Returns the backend error.
    pub async fn set_default_access(
        &self,
        defaults: &DefaultAccessSettings,
    ) -> Result<DefaultAccessSettings, UsersError> {
        Ok(self.api.set_default_access(defaults).await?)
    }

    async fn refresh(&self) -> Result<(), UsersError> {
        let query = self.inner.borrow().last_query.clone();
        self.fetch_users(query).await.map(|_| ())
    }
}
