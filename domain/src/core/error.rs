//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} cannot be empty")]
    EmptyIdentifier(&'static str),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("No turn at index {index} (transcript has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Turn {0} is not an assistant turn")]
    NotAssistantTurn(usize),

    #[error("No user turn precedes index {0}")]
    NoPrecedingUserTurn(usize),

    #[error("Turn {0} changed while its reroll was pending")]
    RerollTargetMoved(usize),

    #[error("Unknown reroll mode: {0}")]
    UnknownRerollMode(String),
}

impl DomainError {
    /// Check if this error comes from a bad transcript index
    pub fn is_index_error(&self) -> bool {
        matches!(self, DomainError::IndexOutOfRange { .. })
    }
}
