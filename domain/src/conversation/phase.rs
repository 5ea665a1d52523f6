//! Conversation view lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a conversation view.
///
/// `Uninitialized → ResolvingSession → LoadingHistory → Ready`, then
/// `Ready ⇄ Submitting` for every submission. A failed resolution or
/// history load falls back to `Uninitialized`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    ResolvingSession,
    LoadingHistory,
    Ready,
    Submitting,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::ResolvingSession => "resolving_session",
            SessionPhase::LoadingHistory => "loading_history",
            SessionPhase::Ready => "ready",
            SessionPhase::Submitting => "submitting",
        }
    }

    /// Whether a remote call is outstanding in this phase
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionPhase::ResolvingSession | SessionPhase::LoadingHistory | SessionPhase::Submitting
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
