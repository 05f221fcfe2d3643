//! Single-flight request gate.
//!
//! User-triggered network calls are one-at-a-time per surface: the signup
//! form, the upload button. The gate makes that discipline an explicit,
//! testable state instead of an ad hoc boolean. Re-entrant submissions are
//! rejected, never queued.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the gated surface currently has a request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestState {
    /// No request pending; submissions are accepted
    #[default]
    Idle,
    /// A request is pending; further submissions are rejected
    InFlight,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::InFlight => "in_flight",
        }
    }
}

/// Gate guarding one invocation surface.
///
/// [`RequestGate::claim`] either claims the gate or reports the re-entrant
/// submission; the returned [`GateClaim`] releases it on every exit path.
#[derive(Debug, Default)]
pub struct RequestGate {
    in_flight: AtomicBool,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RequestState {
        if self.is_in_flight() {
            RequestState::InFlight
        } else {
            RequestState::Idle
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Claim the gate for one request. Returns `None` if a request is
    /// already in flight. The claim releases the gate when dropped.
    #[must_use]
    pub fn claim(&self) -> Option<GateClaim<'_>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(GateClaim { gate: self })
    }
}

/// Held while the gated request is in flight; releases the gate on drop.
#[derive(Debug)]
pub struct GateClaim<'a> {
    gate: &'a RequestGate,
}

impl Drop for GateClaim<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::SeqCst);
    }
}
