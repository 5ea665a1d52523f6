//! Chat backend port
//!
//! Defines the interface for the remote store that owns characters,
//! conversations and persisted messages.

use async_trait::async_trait;
use juno_domain::{Character, CharacterId, ConversationId, Role, Turn, UserId};
use thiserror::Error;

/// Errors that can occur during chat backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// A turn on its way to the remote store, tagged with who said it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub role: Role,
    pub content: String,
    /// User id for user turns, character id for assistant turns
    pub actor_id: String,
}

impl OutgoingMessage {
    pub fn from_user(turn: &Turn, user_id: &UserId) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
            actor_id: user_id.to_string(),
        }
    }

    pub fn from_character(turn: &Turn, character_id: &CharacterId) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
            actor_id: character_id.to_string(),
        }
    }
}

/// Remote store for conversations
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetch the persona a conversation is held with
    async fn fetch_character(&self, id: &CharacterId) -> Result<Character, BackendError>;

    /// Look up the first conversation between a user and a character.
    ///
    /// `Ok(None)` means the pair has not talked yet.
    async fn resolve_first_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Option<ConversationId>, BackendError>;

    /// Create a new conversation between a user and a character
    async fn create_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<ConversationId, BackendError>;

    /// Load every persisted turn of a conversation, in server order
    async fn load_messages(&self, id: &ConversationId) -> Result<Vec<Turn>, BackendError>;

    /// Persist one turn
    async fn persist_message(
        &self,
        id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), BackendError>;
}
