use gloo_storage::{LocalStorage, Storage};
use once_cell::unsync::OnceCell;
use shared::api::{AuthApi, HttpClient, SetupApi, UsersApi};
use shared::config::ClientConfig;
use shared::storage::KeyValueStore;
use shared::{NavigationGuard, SessionStore, SetupStatusCache, UsersStore};
use std::rc::Rc;
use url::Url;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Backend location baked in at build time; same origin when unset.
const API_URL: Option<&str> = option_env!("COMMANDER_API_URL");

thread_local! {
    static SERVICES: OnceCell<Services> = OnceCell::new();
}

/// The dashboard's process-wide collaborators, created on first use.
///
/// Clones are cheap handles onto the same client, session and caches.
#[derive(Clone, Debug)]
pub struct Services {
    pub client: HttpClient,
    pub session: SessionStore,
    pub guard: NavigationGuard,
    pub users: UsersStore,
}

impl Services {
    pub fn shared() -> Self {
        SERVICES.with(|cell| cell.get_or_init(Self::build).clone())
    }

    fn build() -> Self {
        let base_url = api_base_url();
        log(&format!("Using API at {base_url}"));

        let client = HttpClient::new(base_url);
        let api = Rc::new(client.clone());
        let session = SessionStore::new(
            Rc::clone(&api) as Rc<dyn AuthApi>,
            Rc::new(BrowserStorage) as Rc<dyn KeyValueStore>,
        );
        client.register_interceptor(session.unauthorized_interceptor());
        session.restore();

        let guard = NavigationGuard::new(SetupStatusCache::new(
            Rc::clone(&api) as Rc<dyn SetupApi>
        ));
        let users = UsersStore::new(api as Rc<dyn UsersApi>);

        Self {
            client,
            session,
            guard,
            users,
        }
    }
}

/// Resolves `COMMANDER_API_URL` against the page origin, so both absolute
/// URLs and path prefixes work.
pub fn api_base_url() -> Url {
    let origin = web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .and_then(|origin| Url::parse(&origin).ok());

    match (API_URL.filter(|raw| !raw.is_empty()), origin) {
        (Some(raw), origin) => Url::parse(raw)
            .ok()
            .or_else(|| origin.and_then(|origin| origin.join(raw).ok()))
            .unwrap_or_else(|| ClientConfig::with_defaults().api_base_url),
        (None, Some(origin)) => origin,
        (None, None) => ClientConfig::with_defaults().api_base_url,
    }
}

/// `window.localStorage`, holding plain strings so values written by
/// earlier dashboard versions stay readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if LocalStorage::raw().set_item(key, value).is_err() {
            log(&format!("Could not persist '{key}' to local storage"));
        }
    }

    fn remove(&self, key: &str) {
        if LocalStorage::raw().remove_item(key).is_err() {
            log(&format!("Could not remove '{key}' from local storage"));
        }
    }
}
