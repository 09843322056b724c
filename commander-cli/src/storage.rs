//! Session persistence for the CLI: a small JSON object on disk.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::BaseDirs;
use shared::storage::KeyValueStore;
use tracing::warn;

/// Default location of the session file.
pub fn default_session_path() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from("./commander-session.json"),
        |dirs| dirs.config_dir().join("proxmox-commander").join("session.json"),
    )
}

/// Key/value store backed by a JSON file readable only by its owner.
///
/// The whole file is rewritten on every change; it holds four short strings.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read session file {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .with_context(|| format!("corrupt session file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let entries = self.entries.borrow();
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).with_context(|| {
                    format!("failed to remove session file {}", self.path.display())
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(&*entries)?;
        write_private(&self.path, serialized.as_bytes())
            .with_context(|| format!("failed to write session file {}", self.path.display()))
    }

    fn flush_or_warn(&self) {
        if let Err(err) = self.flush() {
            let error = format!("{err:#}");
            warn!(%error, "session file not updated");
        }
    }
}

/// Writes `contents` to `path`. A new file is created owner-only, so the
/// token is never readable by others, and an existing file is narrowed to
/// owner-only before the token lands in it.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // The mode above only applies on creation.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.flush()
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush_or_warn();
    }

    fn remove(&self, key: &str) {
        if self.entries.borrow_mut().remove(key).is_some() {
            self.flush_or_warn();
        }
    }
}
