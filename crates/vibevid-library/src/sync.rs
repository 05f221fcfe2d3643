//! Library synchronization client.
//!
//! Refresh is triggered by mount or by a successful upload — never by
//! polling, never retried automatically. Overlapping refreshes supersede
//! each other: each cycle takes a generation, and a late result from a
//! superseded cycle is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use vibevid_api::ApiClient;
use vibevid_models::{Session, VideoRecord};
use vibevid_session::SessionStore;

/// Observable state of the catalog surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LibraryState {
    /// A refresh cycle is underway
    #[default]
    Loading,
    /// Last refresh failed; message for the surface
    Error(String),
    /// Last refresh succeeded with zero records
    Empty,
    /// Last refresh succeeded; records in server order
    Populated(Vec<VideoRecord>),
}

impl LibraryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryState::Loading => "loading",
            LibraryState::Error(_) => "error",
            LibraryState::Empty => "empty",
            LibraryState::Populated(_) => "populated",
        }
    }

    /// The records, when populated.
    pub fn videos(&self) -> Option<&[VideoRecord]> {
        match self {
            LibraryState::Populated(videos) => Some(videos),
            _ => None,
        }
    }
}

/// Mirrors the authenticated user's video catalog.
pub struct LibraryClient {
    state: RwLock<LibraryState>,
    generation: AtomicU64,
}

impl Default for LibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryClient {
    /// Create a client in the Loading state, as on mount.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LibraryState::Loading),
            generation: AtomicU64::new(0),
        }
    }

    /// Current observable state.
    pub async fn state(&self) -> LibraryState {
        self.state.read().await.clone()
    }

    /// Run one refresh cycle: enter Loading, fetch the catalog, land in
    /// Error / Empty / Populated. A refresh started after this one
    /// supersedes it; the superseded result is discarded.
    ///
    /// An `Unauthorized` rejection clears `store` — the session is gone
    /// everywhere, and the shell falls back to the unauthenticated surface.
    pub async fn refresh(
        &self,
        api: &ApiClient,
        session: &Session,
        store: &SessionStore,
    ) -> LibraryState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = LibraryState::Loading;
        debug!(generation, "Library refresh started");

        let result = api.list_videos(session).await;

        // Teardown applies even to a superseded cycle.
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!("Session rejected by the API, clearing the store");
                if let Err(clear_err) = store.clear().await {
                    warn!("Failed to clear session store: {}", clear_err);
                }
            }
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded refresh result");
            return self.state().await;
        }

        let next = match result {
            Ok(videos) if videos.is_empty() => LibraryState::Empty,
            Ok(videos) => LibraryState::Populated(videos),
            Err(e) => LibraryState::Error(e.detail()),
        };

        debug!(generation, state = next.as_str(), "Library refresh finished");
        *self.state.write().await = next.clone();
        next
    }
}
