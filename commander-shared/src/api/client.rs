use std::{cell::RefCell, fmt, rc::Rc};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{ApiError, AuthApi, ErrorInterceptor, Interceptors, SetupApi, UsersApi};
use crate::config::ClientConfig;
use crate::models::{
    AccessSummary, ChangePasswordRequest, DefaultAccessSettings, GroupAccess, MessageResponse,
    PlaybookAccess, Preferences, PreferencesUpdate, SetupStatus, TokenResponse, UserCreate,
    UserDetail, UserListResponse, UserQuery, UserRecord, UserSummary, UserUpdate,
};

/// `reqwest`-backed implementation of every backend collaborator.
///
/// Clones share the bearer token and the registered interceptors.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Url,
    client: Client,
    token: Rc<RefCell<Option<String>>>,
    interceptors: Rc<Interceptors>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.borrow().is_some())
            .field("interceptors", &self.interceptors.borrow().len())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Client with transport defaults rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Client honouring the configured base URL and, on native targets, the
    /// request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("proxmox-commander/", env!("CARGO_PKG_VERSION")))
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let client = Client::new();

        Ok(Self::with_client(config.api_base_url.clone(), client))
    }

    fn with_client(base_url: Url, client: Client) -> Self {
        Self {
            base_url,
            client,
            token: Rc::new(RefCell::new(None)),
            interceptors: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Root URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The bearer token attached to outgoing requests.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Adds an interceptor that sees every failed call made through this client.
    pub fn register_interceptor(&self, interceptor: Rc<dyn ErrorInterceptor>) {
        self.interceptors.borrow_mut().push(interceptor);
    }

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn notify(&self, error: &ApiError) {
        // Snapshot so an interceptor may register further interceptors.
        let interceptors = self.interceptors.borrow().clone();
        for interceptor in interceptors {
            interceptor.on_error(error);
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let result = match self.apply_auth(request).send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::from_status(status, &body))
            }
            Err(err) => Err(ApiError::NetworkUnreachable(err.to_string())),
        };

        if let Err(error) = &result {
            debug!(error = %error, "backend call failed");
            self.notify(error);
        }
        result
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(drop)
    }
}

#[async_trait(?Send)]
impl SetupApi for HttpClient {
    async fn setup_status(&self) -> Result<SetupStatus, ApiError> {
        let url = self.endpoint(&["setup", "status"]);
        self.json(self.client.get(url)).await
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpClient {
    fn set_bearer_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let form = [("username", username), ("password", password)];
        self.json(self.client.post(url).form(&form)).await
    }

    async fn current_user(&self) -> Result<UserRecord, ApiError> {
        let url = self.endpoint(&["auth", "me"]);
        self.json(self.client.get(url)).await
    }

    async fn access_summary(&self) -> Result<AccessSummary, ApiError> {
        let url = self.endpoint(&["auth", "me", "access"]);
        self.json(self.client.get(url)).await
    }

    async fn preferences(&self) -> Result<Preferences, ApiError> {
        let url = self.endpoint(&["auth", "me", "preferences"]);
        self.json(self.client.get(url)).await
    }

    async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<Preferences, ApiError> {
        let url = self.endpoint(&["auth", "me", "preferences"]);
        self.json(self.client.patch(url).json(update)).await
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["auth", "change-password"]);
        self.json(self.client.post(url).json(request)).await
    }

    async fn init_admin(&self) -> Result<UserSummary, ApiError> {
        let url = self.endpoint(&["auth", "init"]);
        self.json(self.client.post(url)).await
    }
}

#[async_trait(?Send)]
impl UsersApi for HttpClient {
    async fn list_users(&self, query: &UserQuery) -> Result<UserListResponse, ApiError> {
        let url = self.endpoint(&["users"]);
        let pairs = query.to_pairs();
        self.json(self.client.get(url).query(&pairs)).await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserDetail, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string()]);
        self.json(self.client.get(url)).await
    }

    async fn create_user(&self, user: &UserCreate) -> Result<UserDetail, ApiError> {
        let url = self.endpoint(&["users"]);
        self.json(self.client.post(url).json(user)).await
    }

    async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
    ) -> Result<UserDetail, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string()]);
        self.json(self.client.put(url).json(update)).await
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string()]);
        self.empty(self.client.delete(url)).await
    }

    async fn reset_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "reset-password"]);
        let body = serde_json::json!({ "new_password": new_password });
        self.json(self.client.post(url).json(&body)).await
    }

    async fn set_user_groups(
        &self,
        user_id: i64,
        groups: &[String],
    ) -> Result<Vec<GroupAccess>, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "groups"]);
        self.json(self.client.put(url).json(groups)).await
    }

    async fn add_user_group(&self, user_id: i64, group: &str) -> Result<GroupAccess, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "groups"]);
        let body = serde_json::json!({ "group_name": group });
        self.json(self.client.post(url).json(&body)).await
    }

    async fn remove_user_group(&self, user_id: i64, group: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "groups", group]);
        self.empty(self.client.delete(url)).await
    }

    async fn set_user_playbooks(
        &self,
        user_id: i64,
        playbooks: &[String],
    ) -> Result<Vec<PlaybookAccess>, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "playbooks"]);
        self.json(self.client.put(url).json(playbooks)).await
    }

    async fn add_user_playbook(
        &self,
        user_id: i64,
        playbook: &str,
    ) -> Result<PlaybookAccess, ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "playbooks"]);
        let body = serde_json::json!({ "playbook_name": playbook });
        self.json(self.client.post(url).json(&body)).await
    }

    async fn remove_user_playbook(&self, user_id: i64, playbook: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", &user_id.to_string(), "playbooks", playbook]);
        self.empty(self.client.delete(url)).await
    }

    async fn default_access(&self) -> Result<DefaultAccessSettings, ApiError> {
        let url = self.endpoint(&["settings", "defaults"]);
        self.json(self.client.get(url)).await
    }

    async fn set_default_access(
        &self,
        defaults: &DefaultAccessSettings,
    ) -> Result<DefaultAccessSettings, ApiError> {
        let url = self.endpoint(&["settings", "defaults"]);
        self.json(self.client.put(url).json(defaults)).await
    }
}
