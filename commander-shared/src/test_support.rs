//! Scripted backend doubles for unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use async_trait::async_trait;

use crate::api::{ApiError, AuthApi, ErrorInterceptor, Interceptors, SetupApi, UsersApi};
use crate::models::{
    AccessSummary, ChangePasswordRequest, DefaultAccessSettings, GroupAccess, MessageResponse,
    PlaybookAccess, Preferences, PreferencesUpdate, SetupStatus, TokenResponse, UserCreate,
    UserDetail, UserListResponse, UserQuery, UserRecord, UserSummary, UserUpdate,
};

/// Setup endpoint that replays queued answers, optionally yielding to the
/// executor a few times first so callers overlap.
pub(crate) struct MockSetupApi {
    calls: Cell<usize>,
    responses: RefCell<VecDeque<Result<bool, ApiError>>>,
    yields: usize,
}

impl MockSetupApi {
    pub(crate) fn returning(responses: impl IntoIterator<Item = Result<bool, ApiError>>) -> Self {
        Self {
            calls: Cell::new(0),
            responses: RefCell::new(responses.into_iter().collect()),
            yields: 0,
        }
    }

    pub(crate) fn yielding(mut self, yields: usize) -> Self {
        self.yields = yields;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl SetupApi for MockSetupApi {
    async fn setup_status(&self) -> Result<SetupStatus, ApiError> {
        self.calls.set(self.calls.get() + 1);
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
        let next = self.responses.borrow_mut().pop_front();
        match next {
            Some(Ok(setup_complete)) => Ok(SetupStatus {
                setup_complete,
                has_proxmox_config: setup_complete,
                has_secret_key: true,
                has_ssh_key: setup_complete,
                missing_items: if setup_complete {
                    Vec::new()
                } else {
                    vec!["proxmox".to_string()]
                },
            }),
            Some(Err(error)) => Err(error),
            None => Err(ApiError::NetworkUnreachable(
                "no scripted response".to_string(),
            )),
        }
    }
}

pub(crate) fn user_record(id: i64, username: &str, super_admin: bool) -> UserRecord {
    UserRecord {
        id,
        username: username.to_string(),
        email: Some(format!("{username}@lab.local")),
        is_admin: super_admin,
        is_super_admin: super_admin,
        is_active: true,
        theme: "teal".to_string(),
        accessible_groups: vec!["webservers".to_string()],
        accessible_playbooks: vec!["deploy-nginx".to_string()],
        created_at: None,
        last_login: None,
    }
}

/// Auth endpoints backed by a single account.
///
/// Failures are routed through registered interceptors the way
/// [`crate::api::HttpClient`] does it, and `current_user` rejects requests
/// without a bearer token.
pub(crate) struct MockAuthApi {
    pub(crate) password: String,
    pub(crate) user: RefCell<Result<UserRecord, ApiError>>,
    pub(crate) preferences: RefCell<Result<Preferences, ApiError>>,
    pub(crate) access: RefCell<Result<AccessSummary, ApiError>>,
    pub(crate) bearer: RefCell<Option<String>>,
    pub(crate) password_changes: RefCell<Vec<ChangePasswordRequest>>,
    /// Times `current_user` yields to the executor before answering.
    pub(crate) user_yields: Cell<usize>,
    calls: RefCell<Vec<&'static str>>,
    interceptors: Interceptors,
}

impl MockAuthApi {
    pub(crate) fn new() -> Self {
        Self::for_user(user_record(1, "admin", true))
    }

    pub(crate) fn for_user(user: UserRecord) -> Self {
        Self {
            password: "correct horse".to_string(),
            user: RefCell::new(Ok(user)),
            preferences: RefCell::new(Ok(Preferences {
                theme: Some("purple".to_string()),
                dark_mode: Some(crate::models::DarkMode::Light),
                sidebar_logo: Some(crate::models::SidebarLogo::Banner),
            })),
            access: RefCell::new(Ok(AccessSummary {
                is_super_admin: true,
                is_active: true,
                accessible_groups: vec!["webservers".to_string()],
                accessible_playbooks: vec!["deploy-nginx".to_string()],
                can_manage_users: true,
            })),
            bearer: RefCell::new(None),
            password_changes: RefCell::new(Vec::new()),
            user_yields: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            interceptors: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn register_interceptor(&self, interceptor: Rc<dyn ErrorInterceptor>) {
        self.interceptors.borrow_mut().push(interceptor);
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn finish<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(error) = &result {
            let interceptors = self.interceptors.borrow().clone();
            for interceptor in interceptors {
                interceptor.on_error(error);
            }
        }
        result
    }

    fn unauthorized() -> ApiError {
        ApiError::Unauthorized {
            detail: "Could not validate credentials".to_string(),
        }
    }
}

#[async_trait(?Send)]
impl AuthApi for MockAuthApi {
    fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer.borrow_mut() = token;
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.record("login");
        let result = if password == self.password {
            Ok(TokenResponse {
                access_token: format!("token-{username}"),
                token_type: "bearer".to_string(),
            })
        } else {
            Err(ApiError::Unauthorized {
                detail: "Incorrect username or password".to_string(),
            })
        };
        self.finish(result)
    }

    async fn current_user(&self) -> Result<UserRecord, ApiError> {
        self.record("current_user");
        for _ in 0..self.user_yields.get() {
            tokio::task::yield_now().await;
        }
        let result = if self.bearer.borrow().is_some() {
            self.user.borrow().clone()
        } else {
            Err(Self::unauthorized())
        };
        self.finish(result)
    }

    async fn access_summary(&self) -> Result<AccessSummary, ApiError> {
        self.record("access_summary");
        let result = self.access.borrow().clone();
        self.finish(result)
    }

    async fn preferences(&self) -> Result<Preferences, ApiError> {
        self.record("preferences");
        let result = self.preferences.borrow().clone();
        self.finish(result)
    }

    async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<Preferences, ApiError> {
        self.record("update_preferences");
        let result = {
            let mut stored = self.preferences.borrow_mut();
            match &mut *stored {
                Ok(current) => {
                    if let Some(theme) = &update.theme {
                        current.theme = Some(theme.clone());
                    }
                    if let Some(mode) = update.dark_mode {
                        current.dark_mode = Some(mode);
                    }
                    if let Some(logo) = update.sidebar_logo {
                        current.sidebar_logo = Some(logo);
                    }
                    Ok(current.clone())
                }
                Err(error) => Err(error.clone()),
            }
        };
        self.finish(result)
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("change_password");
        let result = if request.current_password == self.password {
            self.password_changes.borrow_mut().push(request.clone());
            Ok(MessageResponse {
                message: "Password changed successfully".to_string(),
            })
        } else {
            Err(ApiError::from_status(
                400,
                r#"{"detail":"Current password is incorrect"}"#,
            ))
        };
        self.finish(result)
    }

    async fn init_admin(&self) -> Result<UserSummary, ApiError> {
        self.record("init_admin");
        Ok(UserSummary {
            id: 1,
            username: "admin".to_string(),
            email: None,
            is_super_admin: true,
            is_active: true,
            netbox_user_id: None,
            created_at: None,
            last_login: None,
        })
    }
}

pub(crate) fn user_summary(id: i64, username: &str, super_admin: bool, active: bool) -> UserSummary {
    UserSummary {
        id,
        username: username.to_string(),
        email: None,
        is_super_admin: super_admin,
        is_active: active,
        netbox_user_id: None,
        created_at: None,
        last_login: None,
    }
}

/// In-memory user directory. `fail_next` makes the following call fail once.
pub(crate) struct MockUsersApi {
    pub(crate) users: RefCell<Vec<UserSummary>>,
    pub(crate) groups: RefCell<Vec<(i64, String)>>,
    pub(crate) playbooks: RefCell<Vec<(i64, String)>>,
    pub(crate) defaults: RefCell<DefaultAccessSettings>,
    pub(crate) fail_next: RefCell<Option<ApiError>>,
    calls: RefCell<Vec<&'static str>>,
}

impl MockUsersApi {
    pub(crate) fn with_users(users: impl IntoIterator<Item = UserSummary>) -> Self {
        Self {
            users: RefCell::new(users.into_iter().collect()),
            groups: RefCell::new(Vec::new()),
            playbooks: RefCell::new(Vec::new()),
            defaults: RefCell::new(DefaultAccessSettings::default()),
            fail_next: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    fn enter(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, r#"{"detail":"User not found"}"#)
    }

    fn detail(&self, user: UserSummary) -> UserDetail {
        let groups: Vec<GroupAccess> = self
            .groups
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, (owner, _))| *owner == user.id)
            .map(|(row, (_, name))| GroupAccess {
                id: i64::try_from(row).unwrap_or_default() + 1,
                group_name: name.clone(),
            })
            .collect();
        let playbooks: Vec<PlaybookAccess> = self
            .playbooks
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, (owner, _))| *owner == user.id)
            .map(|(row, (_, name))| PlaybookAccess {
                id: i64::try_from(row).unwrap_or_default() + 1,
                playbook_name: name.clone(),
            })
            .collect();
        UserDetail {
            accessible_groups: groups.iter().map(|g| g.group_name.clone()).collect(),
            accessible_playbooks: playbooks.iter().map(|p| p.playbook_name.clone()).collect(),
            group_access: groups,
            playbook_access: playbooks,
            user,
        }
    }

    fn find(&self, user_id: i64) -> Result<UserSummary, ApiError> {
        self.users
            .borrow()
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }
}

#[async_trait(?Send)]
impl UsersApi for MockUsersApi {
    async fn list_users(&self, query: &UserQuery) -> Result<UserListResponse, ApiError> {
        self.enter("list_users")?;
        let matching: Vec<UserSummary> = self
            .users
            .borrow()
            .iter()
            .filter(|user| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| user.username.contains(term))
            })
            .cloned()
            .collect();
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(query.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(UserListResponse {
            items: matching.into_iter().skip(skip).take(limit).collect(),
            total,
        })
    }

    async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError> {
        self.enter("get_user")?;
        let user = self.find(user_id)?;
        Ok(self.detail(user))
    }

    async fn create_user(&self, user: &UserCreate) -> Result<UserDetail, ApiError> {
        self.enter("create_user")?;
        if self
            .users
            .borrow()
            .iter()
            .any(|existing| existing.username == user.username)
        {
            return Err(ApiError::from_status(
                400,
                r#"{"detail":"Username already registered"}"#,
            ));
        }
        let id = self.users.borrow().iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let mut summary = user_summary(id, &user.username, user.is_super_admin, true);
        summary.email.clone_from(&user.email);
        self.users.borrow_mut().push(summary.clone());
        Ok(self.detail(summary))
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<UserDetail, ApiError> {
        self.enter("update_user")?;
        let updated = {
            let mut users = self.users.borrow_mut();
            let user = users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(Self::not_found)?;
            if let Some(email) = &update.email {
                user.email = Some(email.clone());
            }
            if let Some(super_admin) = update.is_super_admin {
                user.is_super_admin = super_admin;
            }
            if let Some(active) = update.is_active {
                user.is_active = active;
            }
            user.clone()
        };
        Ok(self.detail(updated))
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.enter("delete_user")?;
        let mut users = self.users.borrow_mut();
        let before = users.len();
        users.retain(|user| user.id != user_id);
        if users.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn reset_password(
        &self,
        user_id: i64,
        _new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.enter("reset_password")?;
        let user = self.find(user_id)?;
        Ok(MessageResponse {
            message: format!("Password for {} has been reset", user.username),
        })
    }

    async fn set_user_groups(
        &self,
        user_id: i64,
        groups: &[String],
    ) -> Result<Vec<GroupAccess>, ApiError> {
        self.enter("set_user_groups")?;
        self.find(user_id)?;
        {
            let mut rows = self.groups.borrow_mut();
            rows.retain(|(owner, _)| *owner != user_id);
            rows.extend(groups.iter().map(|group| (user_id, group.clone())));
        }
        Ok(self.detail(self.find(user_id)?).group_access)
    }

    async fn add_user_group(&self, user_id: i64, group: &str) -> Result<GroupAccess, ApiError> {
        self.enter("add_user_group")?;
        self.find(user_id)?;
        let mut rows = self.groups.borrow_mut();
        rows.push((user_id, group.to_string()));
        Ok(GroupAccess {
            id: i64::try_from(rows.len()).unwrap_or_default(),
            group_name: group.to_string(),
        })
    }

    async fn remove_user_group(&self, user_id: i64, group: &str) -> Result<(), ApiError> {
        self.enter("remove_user_group")?;
        self.groups
            .borrow_mut()
            .retain(|(owner, name)| !(*owner == user_id && name == group));
        Ok(())
    }

    async fn set_user_playbooks(
        &self,
        user_id: i64,
        playbooks: &[String],
    ) -> Result<Vec<PlaybookAccess>, ApiError> {
        self.enter("set_user_playbooks")?;
        self.find(user_id)?;
        {
            let mut rows = self.playbooks.borrow_mut();
            rows.retain(|(owner, _)| *owner != user_id);
            rows.extend(playbooks.iter().map(|name| (user_id, name.clone())));
        }
        Ok(self.detail(self.find(user_id)?).playbook_access)
    }

    async fn add_user_playbook(
        &self,
        user_id: i64,
        playbook: &str,
    ) -> Result<PlaybookAccess, ApiError> {
        self.enter("add_user_playbook")?;
        self.find(user_id)?;
        let mut rows = self.playbooks.borrow_mut();
        rows.push((user_id, playbook.to_string()));
        Ok(PlaybookAccess {
            id: i64::try_from(rows.len()).unwrap_or_default(),
            playbook_name: playbook.to_string(),
        })
    }

    async fn remove_user_playbook(&self, user_id: i64, playbook: &str) -> Result<(), ApiError> {
        self.enter("remove_user_playbook")?;
        self.playbooks
            .borrow_mut()
            .retain(|(owner, name)| !(*owner == user_id && name == playbook));
        Ok(())
    }

    async fn default_access(&self) -> Result<DefaultAccessSettings, ApiError> {
        self.enter("default_access")?;
        Ok(self.defaults.borrow().clone())
    }

    async fn set_default_access(
        &self,
        defaults: &DefaultAccessSettings,
    ) -> Result<DefaultAccessSettings, ApiError> {
        self.enter("set_default_access")?;
        *self.defaults.borrow_mut() = defaults.clone();
        Ok(defaults.clone())
    }
}
