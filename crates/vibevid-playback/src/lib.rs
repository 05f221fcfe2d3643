//! Per-video playback control.
//!
//! Each catalog entry gets its own [`PlaybackController`] bound to one
//! media source. The controller issues transport commands but never
//! assumes they took effect: the engine's own play/pause notifications are
//! the single source of truth for `is_playing`, which keeps the state
//! honest when the engine pauses for buffering or reaches the end.

pub mod controller;
pub mod engine;
pub mod rate;

pub use controller::{PlaybackController, PlaybackState};
pub use engine::{EngineEvent, EngineListener, EngineSubscription, ListenerId, MediaEngine};
pub use rate::PlaybackRate;
