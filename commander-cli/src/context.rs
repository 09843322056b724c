use std::{path::PathBuf, rc::Rc};

use anyhow::{Context as _, Result, bail};
use shared::api::{AuthApi, HttpClient, SetupApi, UsersApi};
use shared::config::ClientConfig;
use shared::storage::KeyValueStore;
use shared::{NavigationGuard, SessionStore, SetupStatusCache, UsersStore};
use tracing::debug;

use crate::storage::{FileStorage, default_session_path};

/// Everything a command needs, wired the same way the dashboard wires it.
#[derive(Debug)]
pub struct Context {
    pub config: ClientConfig,
    pub client: HttpClient,
    pub storage: Rc<FileStorage>,
    pub session: SessionStore,
    pub guard: NavigationGuard,
    pub users: UsersStore,
}

impl Context {
    /// Builds the client stack and restores the persisted session.
    pub fn new(config: ClientConfig, session_file: Option<PathBuf>) -> Result<Self> {
        let client = HttpClient::from_config(&config).context("failed to build HTTP client")?;
        let storage = Rc::new(FileStorage::open(
            session_file.unwrap_or_else(default_session_path),
        )?);

        let api = Rc::new(client.clone());
        let session = SessionStore::new(
            Rc::clone(&api) as Rc<dyn AuthApi>,
            Rc::clone(&storage) as Rc<dyn KeyValueStore>,
        );
        client.register_interceptor(session.unauthorized_interceptor());
        let restored = session.restore();
        debug!(
            restored,
            api = %config.api_base_url,
            session_file = %storage.path().display(),
            "client ready"
        );

        let guard = NavigationGuard::new(SetupStatusCache::new(
            Rc::clone(&api) as Rc<dyn SetupApi>
        ));
        let users = UsersStore::new(api as Rc<dyn UsersApi>);

        Ok(Self {
            config,
            client,
            storage,
            session,
            guard,
            users,
        })
    }

    /// Fails unless a token was restored. Loads the profile behind it.
    pub async fn require_session(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("not signed in; run `commander login` first");
        }
        match self.session.fetch_profile().await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => bail!("not signed in; run `commander login` first"),
            // The store has already dropped the token at this point.
            Err(err) => Err(err)
                .context("failed to load profile; run `commander login` to sign in again"),
        }
    }
}
