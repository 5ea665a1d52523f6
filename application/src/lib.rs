//! Application layer for juno-chat
//!
//! This crate contains use cases, port definitions, and session configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::{
    chat_backend::{BackendError, ChatBackend, OutgoingMessage},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    reply_generator::{GenerationError, ReplyGenerator},
    session_observer::{NoSessionObserver, SessionObserver},
};
pub use use_cases::append_turn::{SendFailure, SendReport, SendStage, SendStep};
pub use use_cases::conversation_session::{ConversationSession, SessionSnapshot};
pub use use_cases::error::SessionError;
pub use use_cases::reroll_turn::RerollOutcome;
