//! Session progress port
//!
//! Lets a front end follow a conversation view while remote calls are in
//! flight: phase changes, turns landing in the transcript, and reply
//! generation starting/finishing.

use juno_domain::{Character, SessionPhase, Turn};

/// Callbacks fired by the session manager.
///
/// Implementations live in the presentation layer. All methods default to no-ops.
pub trait SessionObserver: Send + Sync {
    /// Called whenever the view moves to a new phase
    fn on_phase_changed(&self, _phase: SessionPhase) {}

    /// Called right after a turn is appended to the local transcript
    fn on_turn_appended(&self, _index: usize, _turn: &Turn) {}

    /// Called before the reply generator is invoked
    fn on_generation_started(&self, _character: &Character) {}

    /// Called when the reply generator returns
    fn on_generation_finished(&self, _success: bool) {}
}

/// No-op observer
pub struct NoSessionObserver;

impl SessionObserver for NoSessionObserver {}
