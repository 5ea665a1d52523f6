//! Resolve Session use case.
//!
//! Finds the conversation a user has with a character, creating it on
//! first contact.

use crate::ports::chat_backend::ChatBackend;
use crate::use_cases::error::SessionError;
use juno_domain::{CharacterId, Conversation, UserId};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ResolveSessionUseCase {
    backend: Arc<dyn ChatBackend>,
}

impl ResolveSessionUseCase {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Return the first conversation between the pair, creating one if none exists.
    ///
    /// Remote failures are not retried.
    pub async fn execute(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Conversation, SessionError> {
        let existing = self
            .backend
            .resolve_first_conversation(user_id, character_id)
            .await?;

        let id = match existing {
            Some(id) => {
                debug!("Found conversation {} for {}/{}", id, user_id, character_id);
                id
            }
            None => {
                let id = self
                    .backend
                    .create_conversation(user_id, character_id)
                    .await?;
                info!(
                    "Created conversation {} for {}/{}",
                    id, user_id, character_id
                );
                id
            }
        };

        Ok(Conversation::new(id, user_id.clone(), character_id.clone()))
    }
}
