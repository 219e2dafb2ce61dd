use anyhow::{Context, Result};
use keyring::Entry;

use super::persistence::{StoredToken, TokenSlot};

/// Token slot backed by the OS keychain.
///
/// The stored record is kept as JSON in the entry's secret.
pub struct KeychainTokenSlot {
    entry: Entry,
}

impl KeychainTokenSlot {
    pub fn new(service: &str, slot_name: &str) -> Result<Self> {
        let entry = Entry::new(service, slot_name).context("Failed to create keyring entry")?;
        Ok(Self { entry })
    }
}

impl TokenSlot for KeychainTokenSlot {
    fn load(&self) -> Result<Option<StoredToken>> {
        match self.entry.get_password() {
            Ok(secret) => {
                let stored = serde_json::from_str(&secret)
                    .context("Failed to parse token from keychain")?;
                Ok(Some(stored))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn store(&self, token: &StoredToken) -> Result<()> {
        let secret = serde_json::to_string(token)?;
        self.entry
            .set_password(&secret)
            .context("Failed to store token in keychain")
    }

    fn remove(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
