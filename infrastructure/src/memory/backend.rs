//! InMemoryChatBackend - a JunoChat backend that lives in process memory.
//!
//! Used by `--offline` and handy in integration tests. Conversations are
//! numbered from 1 in creation order; unknown characters are answered with a
//! placeholder persona so any character id can be chatted with.

use async_trait::async_trait;
use juno_application::{BackendError, ChatBackend, OutgoingMessage};
use juno_domain::{Character, CharacterId, Conversation, ConversationId, Turn, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Store {
    characters: HashMap<CharacterId, Character>,
    conversations: Vec<Conversation>,
    messages: HashMap<ConversationId, Vec<Turn>>,
}

#[derive(Default)]
pub struct InMemoryChatBackend {
    store: Mutex<Store>,
}

impl InMemoryChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(self, character: Character) -> Self {
        self.lock()
            .characters
            .insert(character.id.clone(), character);
        self
    }

    /// Turns persisted so far, for inspection.
    pub fn messages(&self, id: &ConversationId) -> Option<Vec<Turn>> {
        self.lock().messages.get(id).cloned()
    }

    pub fn conversation_count(&self) -> usize {
        self.lock().conversations.len()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn placeholder(id: &CharacterId) -> Character {
    Character::new(id.clone(), "Unknown Character")
        .with_description("A stand-in persona for offline chats.")
}

#[async_trait]
impl ChatBackend for InMemoryChatBackend {
    async fn fetch_character(&self, id: &CharacterId) -> Result<Character, BackendError> {
        let mut store = self.lock();
        Ok(store
            .characters
            .entry(id.clone())
            .or_insert_with(|| placeholder(id))
            .clone())
    }

    async fn resolve_first_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Option<ConversationId>, BackendError> {
        Ok(self
            .lock()
            .conversations
            .iter()
            .find(|c| &c.user_id == user_id && &c.character_id == character_id)
            .map(|c| c.id.clone()))
    }

    async fn create_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<ConversationId, BackendError> {
        let mut store = self.lock();
        let id = ConversationId::from(store.conversations.len() as u64 + 1);
        store.conversations.push(Conversation::new(
            id.clone(),
            user_id.clone(),
            character_id.clone(),
        ));
        store.messages.insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn load_messages(&self, id: &ConversationId) -> Result<Vec<Turn>, BackendError> {
        self.lock()
            .messages
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("conversation {id}")))
    }

    async fn persist_message(
        &self,
        id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), BackendError> {
        self.lock()
            .messages
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("conversation {id}")))?
            .push(Turn::new(message.role, message.content.clone()));
        Ok(())
    }
}
