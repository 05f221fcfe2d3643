//! Upload pipeline error types.

use thiserror::Error;

use vibevid_api::ApiError;

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    /// An upload is already in flight on this surface.
    #[error("An upload is already in progress")]
    Busy,

    /// No file staged; the user must select one first.
    #[error("No file selected")]
    NoSelection,

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}
