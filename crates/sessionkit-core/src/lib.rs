//! Client-side session handling for web APIs.
//!
//! This crate provides:
//! - `CredentialStore`: login, profile fetch, and logout for a bearer-token session
//! - `PersistenceBridge`: a durable, TTL-bound copy of the session token
//! - `ApiClient`: an HTTP wrapper that injects the bearer token and reacts to 401
//! - `RouteGuard`: the pre-navigation check that reconciles in-memory and persisted state
//! - `PreferenceStore`: per-user preferences keyed by identity
//!
//! Everything hangs off an explicitly constructed [`SessionContext`].

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod preferences;
pub mod utils;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{
    AuthError, Clock, CredentialStore, FileTokenSlot, GuardDecision, KeychainTokenSlot,
    ManualClock, MemoryTokenSlot, PersistenceBridge, RouteGuard, Session, SessionHandle,
    StoredToken, SystemClock, TokenSlot,
};
pub use config::{Config, TokenBackend};
pub use context::SessionContext;
pub use models::{Credentials, User, UserId};
pub use navigation::{HistoryNavigator, Navigator};
pub use notify::{NotifyLevel, Notifier, Toaster};
pub use preferences::{
    FilePreferenceBackend, MemoryPreferenceBackend, PreferenceBackend, PreferenceStore,
};
