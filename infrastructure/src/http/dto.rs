//! Wire types for the JunoChat REST API.
//!
//! Primary keys arrive as JSON numbers from Django but as strings from some
//! proxies, so every id is read as a raw [`Value`] and normalized.

use juno_application::BackendError;
use juno_domain::{Character, CharacterId, Role, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==================== Requests ====================

#[derive(Debug, Serialize)]
pub(super) struct FirstChatRequest<'a> {
    pub user_id: &'a str,
    pub character_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateChatRequest<'a> {
    pub user: &'a str,
    pub chatbot: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct NewMessageRequest<'a> {
    pub chat: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_bot: Option<&'a str>,
}

// ==================== Responses ====================

#[derive(Debug, Deserialize)]
pub(super) struct CharacterDto {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl CharacterDto {
    pub fn into_character(self) -> Result<Character, BackendError> {
        let id = CharacterId::new(id_string(&self.id, "character id")?)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let mut character =
            Character::new(id, self.name).with_description(self.description.unwrap_or_default());
        if let Some(avatar) = self.avatar.filter(|a| !a.is_empty()) {
            character = character.with_avatar(avatar);
        }
        Ok(character)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FirstChatResponse {
    #[serde(default)]
    pub chat_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedChatResponse {
    pub id: Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatDetailResponse {
    #[serde(default)]
    pub messages: Option<Vec<MessageDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageDto {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sender_user: Option<Value>,
    #[serde(default)]
    pub sender_bot: Option<Value>,
}

impl MessageDto {
    /// `sender_user` marks a user turn, `sender_bot` an assistant turn,
    /// neither a system turn.
    pub fn into_turn(self) -> Turn {
        let present = |v: &Option<Value>| v.as_ref().is_some_and(|v| !v.is_null());
        let role = if present(&self.sender_user) {
            Role::User
        } else if present(&self.sender_bot) {
            Role::Assistant
        } else {
            Role::System
        };
        Turn::new(role, self.description)
    }
}

/// Normalize a JSON id (number or non-empty string) to its string form.
pub(super) fn id_string(value: &Value, what: &str) -> Result<String, BackendError> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        other => Err(BackendError::Decode(format!("unexpected {what}: {other}"))),
    }
}
