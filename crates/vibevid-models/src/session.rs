//! Session models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token authorizing API calls.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// Tokens are credentials; keep them out of debug logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(...{} bytes)", self.0.len())
    }
}

/// The authenticated-identity artifact produced by a successful login.
///
/// Owned exclusively by the session store; every other component works
/// with clones handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token
    pub token: SessionToken,

    /// User ID (owner of the library)
    pub user_id: String,
}

impl Session {
    pub fn new(token: impl Into<SessionToken>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    /// Bearer credential for `Authorization` headers.
    pub fn bearer(&self) -> &str {
        self.token.as_str()
    }
}
