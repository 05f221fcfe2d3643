//! Durable session store.
//!
//! Holds the current [`Session`] behind an async lock and mirrors it into a
//! single JSON record on disk. The record is loaded once at process start;
//! its continued validity is not checked here — the API rejects a stale
//! token with `Unauthorized` on first use, and observers clear this store.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use vibevid_models::{Session, SessionToken};

use crate::error::SessionResult;

/// Default location of the session record, relative to the working directory.
const DEFAULT_SESSION_PATH: &str = ".vibevid/session.json";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the durable session record
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SESSION_PATH),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var("VIBEVID_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_PATH)),
        }
    }
}

// =============================================================================
// Durable record
// =============================================================================

/// On-disk shape of the session record.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: SessionToken,
    user_id: String,
    saved_at: DateTime<Utc>,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user_id: session.user_id.clone(),
            saved_at: Utc::now(),
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(record: PersistedSession) -> Self {
        Self {
            token: record.token,
            user_id: record.user_id,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Process-wide holder of the current session.
pub struct SessionStore {
    config: StoreConfig,
    current: RwLock<Option<Session>>,
    loaded: AtomicBool,
}

impl SessionStore {
    /// Create a new store. No disk access until [`SessionStore::initialize`].
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
            loaded: AtomicBool::new(false),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    /// Load the persisted record, once per process start.
    ///
    /// A present, well-formed record becomes the active session without
    /// re-validating credentials. A corrupt record is discarded with a
    /// warning. Subsequent calls return the in-memory session unchanged.
    pub async fn initialize(&self) -> SessionResult<Option<Session>> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return Ok(self.current().await);
        }

        let bytes = match tokio::fs::read(&self.config.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.config.path.display(), "No persisted session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let session = match serde_json::from_slice::<PersistedSession>(&bytes) {
            Ok(record) => Session::from(record),
            Err(e) => {
                warn!(
                    path = %self.config.path.display(),
                    "Discarding unreadable session record: {}", e
                );
                return Ok(None);
            }
        };

        debug!(user_id = %session.user_id, "Restored persisted session");
        let mut current = self.current.write().await;
        *current = Some(session.clone());
        Ok(Some(session))
    }

    /// Make `session` the current one and persist it durably.
    /// Called only by a successful login.
    pub async fn activate(&self, session: Session) -> SessionResult<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let record = PersistedSession::from(&session);
        let json = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(&self.config.path, json).await?;

        debug!(user_id = %session.user_id, "Session activated and persisted");
        let mut current = self.current.write().await;
        *current = Some(session);
        Ok(())
    }

    /// Drop the session from memory and disk. Idempotent.
    pub async fn clear(&self) -> SessionResult<()> {
        {
            let mut current = self.current.write().await;
            *current = None;
        }

        match tokio::fs::remove_file(&self.config.path).await {
            Ok(()) => debug!("Session record removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Read-only clone of the active session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.current.read().await.is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(StoreConfig {
            path: dir.path().join("session.json"),
        })
    }

    #[tokio::test]
    async fn initialize_without_record_yields_logged_out() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert!(store.initialize().await.unwrap().is_none());
        assert!(!store.is_active().await);
    }

    #[tokio::test]
    async fn activate_persists_across_instances() {
        let dir = tempdir().unwrap();

        let store = store_at(&dir);
        store.activate(Session::new("T", "u1")).await.unwrap();

        // Fresh store over the same path, as after a restart.
        let restarted = store_at(&dir);
        let restored = restarted.initialize().await.unwrap().unwrap();
        assert_eq!(restored.bearer(), "T");
        assert_eq!(restored.user_id, "u1");
    }

    #[tokio::test]
    async fn activate_clear_initialize_round_trip_is_empty() {
        let dir = tempdir().unwrap();

        let store = store_at(&dir);
        store.activate(Session::new("T", "u1")).await.unwrap();
        store.clear().await.unwrap();
        assert!(!store.is_active().await);

        let restarted = store_at(&dir);
        assert!(restarted.initialize().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_is_idempotent_without_session() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_record_is_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = SessionStore::new(StoreConfig { path });
        assert!(store.initialize().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn initialize_loads_only_once() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert!(store.initialize().await.unwrap().is_none());

        // A record appearing later must not be picked up mid-process.
        std::fs::write(
            dir.path().join("session.json"),
            serde_json::to_vec(&PersistedSession::from(&Session::new("T", "u1"))).unwrap(),
        )
        .unwrap();
        assert!(store.initialize().await.unwrap().is_none());
    }
}
