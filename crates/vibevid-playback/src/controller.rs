//! Playback controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::engine::{EngineEvent, EngineSubscription, MediaEngine};
use crate::rate::PlaybackRate;

/// Transport state of one video surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// Whether the engine reported itself playing
    pub is_playing: bool,
    /// Selected speed multiplier
    pub rate: PlaybackRate,
    /// Whether the rate menu is open (purely local UI state)
    pub menu_open: bool,
}

/// Per-video controller bound to one media source.
///
/// `is_playing` is written only from engine events, never from the
/// commands this controller issues.
pub struct PlaybackController {
    engine: Arc<dyn MediaEngine>,
    state: Arc<Mutex<PlaybackState>>,
    _subscription: EngineSubscription,
}

impl PlaybackController {
    /// Bind a controller to `engine`, registering its event listener.
    /// The listener is removed when the controller is dropped; a late
    /// event delivered after drop is a no-op.
    pub fn attach(engine: Arc<dyn MediaEngine>) -> Self {
        let state = Arc::new(Mutex::new(PlaybackState::default()));

        let weak: Weak<Mutex<PlaybackState>> = Arc::downgrade(&state);
        let id = engine.add_listener(Box::new(move |event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = unpoisoned(&state);
            state.is_playing = matches!(event, EngineEvent::Play);
            debug!(?event, is_playing = state.is_playing, "Engine reported transport change");
        }));

        let subscription = EngineSubscription::new(Arc::clone(&engine), id);
        Self {
            engine,
            state,
            _subscription: subscription,
        }
    }

    /// Snapshot of the current transport state.
    pub fn state(&self) -> PlaybackState {
        *unpoisoned(&self.state)
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing
    }

    pub fn rate(&self) -> PlaybackRate {
        self.state().rate
    }

    pub fn menu_open(&self) -> bool {
        self.state().menu_open
    }

    /// Issue a play command if paused, a pause command if playing.
    /// `is_playing` changes only once the engine reports back.
    pub fn toggle_play(&self) {
        if self.is_playing() {
            debug!("Issuing pause command");
            self.engine.pause();
        } else {
            debug!("Issuing play command");
            self.engine.play();
        }
    }

    /// Select a playback rate: commands the engine, records the rate, and
    /// closes the rate menu.
    pub fn set_rate(&self, rate: PlaybackRate) {
        debug!(%rate, "Setting playback rate");
        self.engine.set_rate(rate);
        let mut state = unpoisoned(&self.state);
        state.rate = rate;
        state.menu_open = false;
    }

    /// Flip the rate menu. No engine interaction.
    pub fn toggle_menu(&self) {
        let mut state = unpoisoned(&self.state);
        state.menu_open = !state.menu_open;
    }
}

fn unpoisoned(state: &Mutex<PlaybackState>) -> MutexGuard<'_, PlaybackState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
