//! Load History use case.

use crate::ports::chat_backend::ChatBackend;
use crate::use_cases::error::SessionError;
use juno_domain::{ConversationId, Transcript};
use std::sync::Arc;
use tracing::debug;

/// Fetches the persisted turns of a resolved conversation.
pub struct LoadHistoryUseCase {
    backend: Arc<dyn ChatBackend>,
}

impl LoadHistoryUseCase {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// One remote fetch; server order is kept as-is.
    pub async fn execute(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Transcript, SessionError> {
        let turns = self.backend.load_messages(conversation_id).await?;
        debug!(
            "Loaded {} turns for conversation {}",
            turns.len(),
            conversation_id
        );
        Ok(Transcript::from_turns(turns))
    }
}
