//! Authentication module for managing the client session.
//!
//! This module provides:
//! - `Session`/`SessionHandle`: the in-memory token and user profile
//! - `PersistenceBridge`: the durable, TTL-bound copy of the token
//! - `CredentialStore`: login, profile fetch, and logout
//! - `RouteGuard`: pre-navigation check and reconciliation
//!
//! Only `CredentialStore` writes to the persistence bridge. Persisted tokens
//! expire after 7 days by default.

pub mod clock;
pub mod error;
pub mod guard;
pub mod keychain;
pub mod persistence;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use guard::{GuardDecision, RouteGuard};
pub use keychain::KeychainTokenSlot;
pub use persistence::{
    FileTokenSlot, MemoryTokenSlot, PersistenceBridge, SameSite, StoredToken, TokenSlot,
};
pub use session::{Session, SessionHandle};
pub use store::CredentialStore;
