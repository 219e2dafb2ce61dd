use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity key used when a user has neither an id nor an email.
pub const DEFAULT_IDENTITY: &str = "default";

/// Fallback display name for a user without a name.
const GUEST_NAME: &str = "Guest";

/// User identifier as sent by the server - either numeric or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// Zero and the empty string carry no identity.
    fn is_blank(&self) -> bool {
        match self {
            UserId::Number(n) => *n == 0,
            UserId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Number(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId::Text(id.to_string())
    }
}

/// User profile. The server may omit any field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Name for display, "Guest" when the profile has none
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(GUEST_NAME)
    }

    /// Stable key for per-user storage.
    ///
    /// Precedence is id, then email, then [`DEFAULT_IDENTITY`].
    pub fn identity_key(&self) -> String {
        if let Some(id) = self.id.as_ref().filter(|id| !id.is_blank()) {
            return id.to_string();
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            return email.to_string();
        }
        DEFAULT_IDENTITY.to_string()
    }
}
