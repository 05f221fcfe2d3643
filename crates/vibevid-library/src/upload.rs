//! Upload pipeline.
//!
//! One upload in flight per pipeline; the staged selection is consumed
//! whether the upload succeeds or fails, so retrying always means
//! reselecting the file. Success refreshes the library.

use std::path::Path;

use tokio::sync::RwLock;
use tracing::{info, warn};

use vibevid_api::ApiClient;
use vibevid_models::{RequestGate, RequestState, Session};
use vibevid_session::SessionStore;

use crate::error::{UploadError, UploadResult};
use crate::sync::LibraryClient;

/// A file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl FileSelection {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Stage a file from disk, deriving the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> UploadResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_content_type(path).to_string();
        Ok(Self {
            file_name,
            bytes,
            content_type,
        })
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Pushes one staged file at a time under the current session.
pub struct UploadPipeline {
    gate: RequestGate,
    selection: RwLock<Option<FileSelection>>,
    last_error: RwLock<Option<String>>,
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPipeline {
    pub fn new() -> Self {
        Self {
            gate: RequestGate::new(),
            selection: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    /// Stage a file, replacing any previous selection. Rejected while an
    /// upload is in flight (the triggering control is disabled then).
    pub async fn select(&self, selection: FileSelection) -> UploadResult<()> {
        if self.gate.is_in_flight() {
            return Err(UploadError::Busy);
        }
        *self.last_error.write().await = None;
        *self.selection.write().await = Some(selection);
        Ok(())
    }

    /// Name of the staged file, if any.
    pub async fn pending(&self) -> Option<String> {
        self.selection.read().await.as_ref().map(|s| s.file_name.clone())
    }

    /// Last upload failure message for the surface.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    pub fn state(&self) -> RequestState {
        self.gate.state()
    }

    /// Push the staged file. Gate-guarded: a second call while one is in
    /// flight is rejected. The selection is consumed regardless of outcome.
    /// Success signals `library` to refresh.
    pub async fn upload(
        &self,
        api: &ApiClient,
        session: &Session,
        store: &SessionStore,
        library: &LibraryClient,
    ) -> UploadResult<()> {
        let _claim = self.gate.claim().ok_or(UploadError::Busy)?;

        let selection = self
            .selection
            .write()
            .await
            .take()
            .ok_or(UploadError::NoSelection)?;

        info!(file = %selection.file_name, size = selection.bytes.len(), "Upload started");
        let result = api
            .upload(
                session,
                &selection.file_name,
                selection.bytes,
                &selection.content_type,
            )
            .await;

        match result {
            Ok(()) => {
                info!(file = %selection.file_name, "Upload finished");
                *self.last_error.write().await = None;
                library.refresh(api, session, store).await;
                Ok(())
            }
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Session rejected by the API, clearing the store");
                    if let Err(clear_err) = store.clear().await {
                        warn!("Failed to clear session store: {}", clear_err);
                    }
                }
                *self.last_error.write().await = Some(e.detail());
                Err(e.into())
            }
        }
    }
}
