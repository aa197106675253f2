//! Key/value persistence for user preferences
//!
//! Only the chosen interface language is stored today. A missing or broken
//! store must never take the application down, so callers treat every
//! failure here as "nothing persisted".

use crate::error::{Result, UgcError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// String key/value store that survives between sessions
pub trait Persistence: Send + Sync + fmt::Debug {
    /// Read a stored value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. a language chosen in a previous session
    pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.lock().insert(key.into(), value.into());
        self
    }
}

impl Persistence for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file holding a flat string map
///
/// Writes go to a sibling temporary file that is renamed over the target.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Persistence for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                warn!("Ignoring unreadable preference file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        // A corrupt file is replaced rather than blocking every future write
        let mut items = self.read_all().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                UgcError::persistence_with_source(
                    format!("Cannot create directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&items)?).map_err(|e| {
            UgcError::persistence_with_source(format!("Cannot write {}", tmp.display()), e)
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            UgcError::persistence_with_source(
                format!("Cannot replace {}", self.path.display()),
                e,
            )
        })?;

        debug!("Persisted '{}' to {}", key, self.path.display());
        Ok(())
    }
}
