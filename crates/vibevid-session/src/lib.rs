//! Process-wide session store.
//!
//! Exactly one component owns the current session and its durable record:
//! this store. Everything else receives clones via [`SessionStore::current`].

pub mod error;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use store::{SessionStore, StoreConfig};
