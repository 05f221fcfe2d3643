//! Media engine abstraction.
//!
//! The engine owns decode, buffering, and actual playback; the controller
//! only issues commands and listens. Listener registration is symmetric by
//! construction: [`EngineSubscription`] detaches on drop, on every exit
//! path, so no callback can outlive its controller.

use std::sync::Arc;

use crate::rate::PlaybackRate;

/// Notification from the engine's own event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEvent {
    /// Playback actually started
    Play,
    /// Playback actually stopped (user pause, buffering stall, end of media)
    Pause,
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked for each engine event.
pub type EngineListener = Box<dyn Fn(EngineEvent) + Send + Sync>;

/// Transport surface of one media source.
pub trait MediaEngine: Send + Sync {
    /// Ask the engine to start playing. Takes effect asynchronously; the
    /// engine reports the outcome through its event stream.
    fn play(&self);

    /// Ask the engine to pause.
    fn pause(&self);

    /// Set the playback speed multiplier.
    fn set_rate(&self, rate: PlaybackRate);

    /// Register an event listener.
    fn add_listener(&self, listener: EngineListener) -> ListenerId;

    /// Deregister a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Scoped listener registration; detaches on drop.
pub struct EngineSubscription {
    engine: Arc<dyn MediaEngine>,
    id: ListenerId,
}

impl EngineSubscription {
    pub fn new(engine: Arc<dyn MediaEngine>, id: ListenerId) -> Self {
        Self { engine, id }
    }
}

impl Drop for EngineSubscription {
    fn drop(&mut self) {
        self.engine.remove_listener(self.id);
    }
}
