//! Error taxonomy shared by the session use cases.

use crate::ports::chat_backend::BackendError;
use crate::ports::reply_generator::GenerationError;
use juno_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the conversation session and its use cases
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Network or backend failure on any remote call
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Empty submission or a bad transcript index
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing to act on (e.g. no user turn precedes a reroll target)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another submission holds the session
    #[error("Another message is still being sent")]
    Busy,

    /// No conversation has been opened yet
    #[error("No conversation is open")]
    NotReady,
}

impl SessionError {
    /// Whether this error came from a remote call
    pub fn is_remote(&self) -> bool {
        matches!(self, SessionError::RemoteUnavailable(_))
    }
}

impl From<BackendError> for SessionError {
    fn from(e: BackendError) -> Self {
        SessionError::RemoteUnavailable(e.to_string())
    }
}

impl From<GenerationError> for SessionError {
    fn from(e: GenerationError) -> Self {
        SessionError::RemoteUnavailable(e.to_string())
    }
}

impl From<DomainError> for SessionError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NoPrecedingUserTurn(_) => SessionError::NotFound(e.to_string()),
            _ => SessionError::InvalidInput(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_errors_convert() {
        let e: SessionError = BackendError::Unauthorized.into();
        assert_eq!(e, SessionError::RemoteUnavailable("Unauthorized".to_string()));
        assert!(e.is_remote());

        let e: SessionError = GenerationError::EmptyReply.into();
        assert!(e.is_remote());
    }

    #[test]
    fn test_domain_errors_convert() {
        let e: SessionError = DomainError::NoPrecedingUserTurn(3).into();
        assert!(matches!(e, SessionError::NotFound(_)));

        let e: SessionError = DomainError::IndexOutOfRange { index: 1, len: 0 }.into();
        assert!(matches!(e, SessionError::InvalidInput(_)));
        assert!(!e.is_remote());
    }
}
