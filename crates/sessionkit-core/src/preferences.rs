//! Per-user preferences.
//!
//! Values are cached in memory and, while a user is known, written to a
//! durable backend under `preference:<name>:<identity>`. Durable entries have
//! no expiry and outlive logout; the in-memory cache does not.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::auth::SessionHandle;

/// Preference name for the UI theme
pub const THEME: &str = "theme";

/// Durable, unscoped key-value storage.
pub trait PreferenceBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Storage key for `name` under a user identity
pub fn preference_key(name: &str, identity: &str) -> String {
    format!("preference:{}:{}", name, identity)
}

pub struct PreferenceStore {
    cache: Mutex<HashMap<String, String>>,
    backend: Box<dyn PreferenceBackend>,
    session: SessionHandle,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn PreferenceBackend>, session: SessionHandle) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            backend,
            session,
        }
    }

    pub fn set_preference(&self, name: &str, value: &str) {
        self.cache.lock().insert(name.to_string(), value.to_string());

        if let Some(identity) = self.session.identity_key() {
            let key = preference_key(name, &identity);
            if let Err(e) = self.backend.set(&key, value) {
                warn!(error = %e, name, "Failed to persist preference");
            }
        }
    }

    /// The durable value for the current user wins over the cache
    pub fn get_preference(&self, name: &str) -> Option<String> {
        if let Some(identity) = self.session.identity_key() {
            let key = preference_key(name, &identity);
            match self.backend.get(&key) {
                Ok(Some(value)) if !value.is_empty() => {
                    self.cache.lock().insert(name.to_string(), value.clone());
                    return Some(value);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, name, "Failed to read preference"),
            }
        }
        self.cache.lock().get(name).cloned()
    }

    /// Drop session-scoped values. Durable entries are kept.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        debug!("Preference cache cleared");
    }

    pub fn theme(&self) -> Option<String> {
        self.get_preference(THEME)
    }

    pub fn set_theme(&self, theme: &str) {
        self.set_preference(THEME, theme);
    }
}

/// Preferences stored as one JSON object in a file.
pub struct FilePreferenceBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceBackend {
    /// Backend at `<dir>/preferences.json`
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join("preferences.json"),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read preferences file")?;
        serde_json::from_str(&contents).context("Failed to parse preferences file")
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents).context("Failed to write preferences file")?;
        Ok(())
    }
}

impl PreferenceBackend for FilePreferenceBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryPreferenceBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
