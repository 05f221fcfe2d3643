//! Video catalog models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a stored video. Assigned by the server; opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry of the user's video catalog, as returned by the list endpoint.
///
/// Immutable; identity is `id`. Field names are bound to the wire contract
/// (`_id`, `original_name`, `content_type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Server-assigned video ID
    #[serde(rename = "_id")]
    pub id: VideoId,

    /// Name the file was uploaded under
    #[serde(rename = "original_name")]
    pub display_name: String,

    /// MIME type of the stored media
    #[serde(rename = "content_type")]
    pub media_type: String,
}
