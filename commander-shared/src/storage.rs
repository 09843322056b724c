//! Persisted client-side state.
//!
//! The session keeps four string values across restarts. Where they live
//! depends on the client: browser local storage for the dashboard, a file for
//! the CLI, memory for tests.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Bearer token of the current session.
pub const TOKEN_KEY: &str = "token";
/// Last known accent color.
pub const THEME_KEY: &str = "theme";
/// Last known dark mode setting.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Last known sidebar logo style.
pub const SIDEBAR_LOGO_KEY: &str = "sidebarLogo";

/// Minimal string key/value persistence.
///
/// Writes are best-effort: implementations log and drop failures rather than
/// surfacing them, since losing a cached preference must never break a
/// session operation.
pub trait KeyValueStore {
    /// The stored value, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
    /// Deletes `key`; missing keys are ignored.
    fn remove(&self, key: &str);
}

/// In-memory store; clones share the same entries.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
