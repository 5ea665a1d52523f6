//! Session parameters: how a conversation view behaves.

use juno_domain::RerollMode;
use serde::{Deserialize, Serialize};

/// Behavior knobs for [`ConversationSession`](crate::ConversationSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Where a rerolled reply lands relative to the rerolled turn.
    pub reroll_mode: RerollMode,
}

impl SessionParams {
    pub fn with_reroll_mode(mut self, mode: RerollMode) -> Self {
        self.reroll_mode = mode;
        self
    }
}
