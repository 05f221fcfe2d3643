//! HTTP client for the Vibe Videos backend API.
//!
//! The backend is a black box behind a small REST contract: signup, verify,
//! login, list, upload, stream. This crate owns the wire shapes, the
//! bearer-credential plumbing, and the mapping from non-2xx responses to
//! the client error taxonomy.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, ApiConfig};
pub use error::{ApiError, ApiResult, Operation};
pub use types::SignupReceipt;
