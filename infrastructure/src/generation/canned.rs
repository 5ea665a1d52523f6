//! Offline generator that always greets.

use async_trait::async_trait;
use juno_application::{GenerationError, ReplyGenerator};
use juno_domain::{Character, Turn};

/// Replies `Hello! I'm {name}. How can I help you?` to everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedReplyGenerator;

#[async_trait]
impl ReplyGenerator for CannedReplyGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate_reply(
        &self,
        _transcript: &[Turn],
        character: &Character,
    ) -> Result<String, GenerationError> {
        Ok(format!("Hello! I'm {}. How can I help you?", character.name))
    }
}
