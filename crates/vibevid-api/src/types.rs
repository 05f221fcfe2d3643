//! API request/response wire types.

use serde::{Deserialize, Serialize};
use vibevid_models::{ContactIdentity, VideoRecord};

/// Signup request body: contact identity flattened next to the password.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    #[serde(flatten)]
    pub identity: &'a ContactIdentity,
    pub password: &'a str,
}

/// What a successful signup hands back: a hint for the one-time code.
/// The demo backend returns the code itself so the surface can show it.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupReceipt {
    #[serde(rename = "otp")]
    pub otp_hint: String,
}

/// Verification request body.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    #[serde(flatten)]
    pub identity: &'a ContactIdentity,
    pub code: &'a str,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(flatten)]
    pub identity: &'a ContactIdentity,
    pub password: &'a str,
}

/// List response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
