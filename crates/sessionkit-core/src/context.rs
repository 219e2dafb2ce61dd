//! Wiring for one client session.
//!
//! `SessionContext` builds every component from a [`Config`] and hands out
//! references. There is no global state; construct one context at startup
//! and pass it around.

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiClient;
use crate::auth::{
    Clock, CredentialStore, FileTokenSlot, KeychainTokenSlot, PersistenceBridge, RouteGuard,
    SessionHandle, SystemClock, TokenSlot,
};
use crate::config::{Config, TokenBackend, APP_NAME};
use crate::navigation::Navigator;
use crate::notify::Toaster;
use crate::preferences::{FilePreferenceBackend, PreferenceBackend, PreferenceStore};

pub struct SessionContext {
    config: Arc<Config>,
    session: SessionHandle,
    bridge: Arc<PersistenceBridge>,
    api: ApiClient,
    credentials: CredentialStore,
    guard: RouteGuard,
    preferences: Arc<PreferenceStore>,
    toaster: Toaster,
}

impl SessionContext {
    /// Build a context with the configured token backend and file-backed
    /// preferences in the data directory.
    pub fn from_config(
        config: Config,
        navigator: Arc<dyn Navigator>,
        toaster: Toaster,
    ) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let slot: Box<dyn TokenSlot> = match config.token_backend {
            TokenBackend::File => {
                Box::new(FileTokenSlot::new(data_dir.clone(), &config.token_slot_name))
            }
            TokenBackend::Keychain => {
                Box::new(KeychainTokenSlot::new(APP_NAME, &config.token_slot_name)?)
            }
        };
        let preferences = Box::new(FilePreferenceBackend::new(data_dir));
        Self::new(config, slot, preferences, Arc::new(SystemClock), navigator, toaster)
    }

    pub fn new(
        config: Config,
        slot: Box<dyn TokenSlot>,
        preference_backend: Box<dyn PreferenceBackend>,
        clock: Arc<dyn Clock>,
        navigator: Arc<dyn Navigator>,
        toaster: Toaster,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let session = SessionHandle::new();
        let bridge = Arc::new(PersistenceBridge::with_clock(slot, clock));
        let preferences = Arc::new(PreferenceStore::new(preference_backend, session.clone()));
        let api = ApiClient::new(
            &config,
            session.clone(),
            Arc::clone(&bridge),
            Arc::clone(&navigator),
        )?;
        let credentials = CredentialStore::new(
            &config,
            api.clone(),
            session.clone(),
            Arc::clone(&bridge),
            Arc::clone(&preferences),
            Arc::clone(&navigator),
        );
        let guard = RouteGuard::new(
            Arc::clone(&config),
            session.clone(),
            Arc::clone(&bridge),
            navigator,
        );

        Ok(Self {
            config,
            session,
            bridge,
            api,
            credentials,
            guard,
            preferences,
            toaster,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Read access to the persisted token
    pub fn persisted(&self) -> &PersistenceBridge {
        &self.bridge
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }
}
