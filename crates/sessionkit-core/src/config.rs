//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL, the auth endpoints, the login route, and how the session token
//! is persisted.
//!
//! Configuration is stored at `~/.config/sessionkit/config.json`. The API base
//! can be overridden with `SESSIONKIT_API_BASE`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "sessionkit";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

const ENV_API_BASE: &str = "SESSIONKIT_API_BASE";

/// Where the session token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// JSON file in the data directory
    #[default]
    File,
    /// OS keychain
    Keychain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    /// Shown in greetings and status output
    pub app_name: String,
    /// Destination used for every redirect to login
    pub login_route: String,
    /// Destinations the route guard never blocks
    pub public_routes: Vec<String>,
    pub login_endpoint: String,
    pub profile_endpoint: String,
    /// Name of the durable token slot (file stem or keychain entry)
    pub token_slot_name: String,
    pub token_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub token_backend: TokenBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3001/api".to_string(),
            app_name: "My App".to_string(),
            login_route: "/login".to_string(),
            public_routes: vec!["/login".to_string()],
            login_endpoint: "/auth/login".to_string(),
            profile_endpoint: "/auth/me".to_string(),
            token_slot_name: "auth_token".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            request_timeout_secs: 30,
            token_backend: TokenBackend::File,
        }
    }
}

impl Config {
    /// Load the config file (defaults if missing) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write to the default location and return the path written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup(ENV_API_BASE).filter(|v| !v.is_empty()) {
            self.api_base = api_base;
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the persisted token, preferences, and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_public_route(&self, destination: &str) -> bool {
        let path = destination
            .split(['?', '#'])
            .next()
            .unwrap_or(destination);
        self.public_routes.iter().any(|r| r == path)
    }
}
