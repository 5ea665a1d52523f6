//! Conversation and character entities

use crate::core::ids::{CharacterId, ConversationId, UserId};
use serde::{Deserialize, Serialize};

/// The persistent pairing of one user and one character (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub user_id: UserId,
    pub character_id: CharacterId,
}

impl Conversation {
    pub fn new(id: ConversationId, user_id: UserId, character_id: CharacterId) -> Self {
        Self {
            id,
            user_id,
            character_id,
        }
    }
}

/// A chat persona, read-only to the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Character {
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            avatar: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
