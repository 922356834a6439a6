//! Key-value persistence behind the interaction store.
//!
//! The store only needs `get` and `set` on string values, so backends are
//! interchangeable:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`FilePersistence`] | One JSON object file on disk, shared between processes |
//! | [`MemoryPersistence`] | Shared in-memory map for tests and ephemeral sessions |

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

/// Key holding the JSON map of article id to like count.
pub const LIKES_KEY: &str = "news_likes";
/// Key holding the JSON map of article id to comment list.
pub const COMMENTS_KEY: &str = "news_comments";
/// Key holding the display name as a plain string.
pub const DISPLAY_NAME_KEY: &str = "user_name";

/// Synchronous string key-value storage.
pub trait Persistence {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory backend.
///
/// Clones share the same map, so a test can hold one handle while the store
/// owns another and observe or tamper with what was persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Persistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File backend storing every key in a single JSON object.
///
/// Reads go to disk each time so that writes made by another process are
/// picked up by [`crate::store::InteractionStore::refresh`]. Writes update a
/// single key and replace the file atomically through a temporary sibling.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the whole file; a missing or unreadable file reads as empty.
    fn load(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read state file; treating as empty");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State file is not a JSON object of strings; treating as empty");
                BTreeMap::new()
            }
        }
    }

    /// Load the whole file before a write.
    ///
    /// Only a missing file reads as empty. A file that exists but cannot be
    /// read or decoded is an error, so `set` never replaces keys it could
    /// not see.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(Error::Persistence(format!(
                    "reading {}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            Error::Persistence(format!(
                "{} is not a JSON object of strings; refusing to overwrite: {e}",
                self.path.display()
            ))
        })
    }
}

impl Persistence for FilePersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    #[instrument(level = "debug", skip(self, value), fields(path = %self.path.display()))]
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Persistence(format!("replacing {}: {e}", self.path.display()))
        })?;
        debug!(bytes = value.len(), "Persisted key");
        Ok(())
    }
}
