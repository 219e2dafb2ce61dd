//! Durable copy of the session token.
//!
//! The bridge keeps only the token (never the profile) together with its
//! expiry. Writes and clears are crate-private: the credential store is the
//! only writer. Anyone may read.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};

/// Cross-site scoping recorded with the token. Enforcing it is up to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub same_site: SameSite,
}

impl StoredToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}

/// A durable slot holding at most one token.
pub trait TokenSlot: Send + Sync {
    fn load(&self) -> Result<Option<StoredToken>>;
    fn store(&self, token: &StoredToken) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

pub struct PersistenceBridge {
    slot: Box<dyn TokenSlot>,
    clock: Arc<dyn Clock>,
}

impl PersistenceBridge {
    pub fn new(slot: Box<dyn TokenSlot>) -> Self {
        Self::with_clock(slot, Arc::new(SystemClock))
    }

    pub fn with_clock(slot: Box<dyn TokenSlot>, clock: Arc<dyn Clock>) -> Self {
        Self { slot, clock }
    }

    /// Store `token`, valid for `ttl` from now
    pub(crate) fn write(&self, token: &str, ttl: StdDuration) -> Result<()> {
        let ttl = Duration::from_std(ttl).context("Token TTL out of range")?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .context("Token TTL out of range")?;
        let stored = StoredToken {
            token: token.to_string(),
            expires_at,
            same_site: SameSite::Lax,
        };
        self.slot.store(&stored)?;
        debug!(expires_at = %stored.expires_at, "Persisted session token");
        Ok(())
    }

    /// The stored token, if present and not expired
    pub fn read(&self) -> Option<String> {
        self.read_record().map(|s| s.token)
    }

    /// The full stored record, if present and not expired
    pub fn read_record(&self) -> Option<StoredToken> {
        match self.slot.load() {
            Ok(Some(stored)) if !stored.is_expired_at(self.clock.now()) => Some(stored),
            Ok(Some(_)) => {
                debug!("Persisted session token has expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session token");
                None
            }
        }
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.slot.remove()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Token slot backed by a JSON file.
pub struct FileTokenSlot {
    path: PathBuf,
}

impl FileTokenSlot {
    /// Slot at `<dir>/<name>.json`
    pub fn new(dir: PathBuf, name: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", name)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenSlot for FileTokenSlot {
    fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read token file")?;
        let stored = serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(stored))
    }

    fn store(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }
        let contents = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// In-process token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenSlot {
    value: Mutex<Option<StoredToken>>,
}

impl MemoryTokenSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSlot for MemoryTokenSlot {
    fn load(&self) -> Result<Option<StoredToken>> {
        Ok(self.value.lock().clone())
    }

    fn store(&self, token: &StoredToken) -> Result<()> {
        *self.value.lock() = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.value.lock() = None;
        Ok(())
    }
}
