//! Playback rate selector values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Playback speed multiplier. The set is closed: anything outside it is
/// unrepresentable, so callers cannot hand the engine a bogus rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackRate {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    /// Every selectable rate, in menu order.
    pub const ALL: [PlaybackRate; 6] = [
        PlaybackRate::Half,
        PlaybackRate::ThreeQuarters,
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
        PlaybackRate::Double,
    ];

    /// Multiplier handed to the media engine.
    pub fn as_f64(&self) -> f64 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }

    /// Parse a multiplier back into the closed set. All members are dyadic,
    /// so exact comparison is sound.
    pub fn from_f64(value: f64) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.as_f64() == value)
    }

    /// Menu label, e.g. `1.25x`.
    pub fn label(&self) -> String {
        format!("{}x", self.as_f64())
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
