use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::User;

/// The in-memory session.
///
/// `user` is only ever set while `token` is set. After a reload the token may
/// be adopted from persisted state before any user is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle to the session. Clones point at the same state.
///
/// Reads are open to every component; mutations are crate-private so that
/// only the credential store and route guard change the session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    /// Identity key of the current user, if one is known
    pub fn identity_key(&self) -> Option<String> {
        self.inner.read().user.as_ref().map(User::identity_key)
    }

    /// Replace token and user in one step
    pub(crate) fn establish(&self, token: String, user: User) -> Session {
        let mut session = self.inner.write();
        session.token = Some(token);
        session.user = Some(user);
        debug!("Session established");
        session.clone()
    }

    /// Update the profile. Returns false (and changes nothing) without a token.
    pub(crate) fn set_user(&self, user: User) -> bool {
        let mut session = self.inner.write();
        if session.token.is_none() {
            return false;
        }
        session.user = Some(user);
        true
    }

    /// Adopt a persisted token. Only takes effect while no token is held.
    pub(crate) fn adopt_token(&self, token: String) -> bool {
        let mut session = self.inner.write();
        if session.token.is_some() {
            return false;
        }
        session.token = Some(token);
        debug!("Adopted persisted token");
        true
    }

    pub(crate) fn clear(&self) {
        let mut session = self.inner.write();
        session.token = None;
        session.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SessionHandle::new();
        let other = handle.clone();

        handle.establish("t1".to_string(), user("A"));
        assert_eq!(other.token().as_deref(), Some("t1"));
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_set_user_requires_token() {
        let handle = SessionHandle::new();
        assert!(!handle.set_user(user("A")));
        assert_eq!(handle.user(), None);

        handle.adopt_token("t".to_string());
        assert!(handle.set_user(user("A")));
        assert_eq!(handle.user(), Some(user("A")));
    }

    #[test]
    fn test_adopt_token_does_not_overwrite() {
        let handle = SessionHandle::new();
        handle.establish("live".to_string(), user("A"));

        assert!(!handle.adopt_token("stale".to_string()));
        assert_eq!(handle.token().as_deref(), Some("live"));
    }

    #[test]
    fn test_clear() {
        let handle = SessionHandle::new();
        handle.establish("t".to_string(), user("A"));
        handle.clear();
        assert_eq!(handle.snapshot(), Session::default());
    }
}
