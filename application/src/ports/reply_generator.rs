//! Reply generator port
//!
//! Defines the interface for the completion endpoint that plays a character.

use async_trait::async_trait;
use juno_domain::{Character, Turn};
use thiserror::Error;

/// Errors that can occur while generating a reply
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode completion: {0}")]
    Decode(String),

    #[error("Completion contained no reply")]
    EmptyReply,
}

/// Generates one assistant reply for a transcript
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Short name for logs (e.g. "openrouter")
    fn name(&self) -> &str;

    /// Produce exactly one reply in character for the given turns.
    async fn generate_reply(
        &self,
        transcript: &[Turn],
        character: &Character,
    ) -> Result<String, GenerationError>;
}
