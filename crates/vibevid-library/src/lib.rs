//! Video library synchronization and uploads.
//!
//! [`LibraryClient`] mirrors the authenticated user's catalog into one of
//! four observable states; [`UploadPipeline`] pushes a staged file under
//! the current session and refreshes the library on success.

pub mod error;
pub mod sync;
pub mod upload;

pub use error::{UploadError, UploadResult};
pub use sync::{LibraryClient, LibraryState};
pub use upload::{FileSelection, UploadPipeline};
