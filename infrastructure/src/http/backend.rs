//! HttpChatBackend - JunoChat REST API over reqwest.

use super::dto::{
    CharacterDto, ChatDetailResponse, CreateChatRequest, CreatedChatResponse, FirstChatRequest,
    FirstChatResponse, MessageDto, NewMessageRequest, id_string,
};
use async_trait::async_trait;
use juno_application::{BackendError, ChatBackend, OutgoingMessage};
use juno_domain::{Character, CharacterId, ConversationId, Role, Turn, UserId};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Chat backend that talks to the JunoChat REST API.
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpChatBackend {
    /// Create a backend rooted at `base_url` (e.g. `http://localhost:8000/api/`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Send `Authorization: Token <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        debug!("GET {}", path);
        let response = self.send(self.client.get(self.url(path))).await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        debug!("POST {}", path);
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

fn conversation_id(value: &serde_json::Value) -> Result<ConversationId, BackendError> {
    ConversationId::new(id_string(value, "chat id")?)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn fetch_character(&self, id: &CharacterId) -> Result<Character, BackendError> {
        let dto: CharacterDto = self.get_json(&format!("characters/{}/", id)).await?;
        dto.into_character()
    }

    async fn resolve_first_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Option<ConversationId>, BackendError> {
        let response: FirstChatResponse = self
            .post_json(
                "chats/get_first_chat/",
                &FirstChatRequest {
                    user_id: user_id.as_str(),
                    character_id: character_id.as_str(),
                },
            )
            .await?;

        match response.chat_id {
            Some(value) if !value.is_null() => conversation_id(&value).map(Some),
            _ => Ok(None),
        }
    }

    async fn create_conversation(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<ConversationId, BackendError> {
        let created: CreatedChatResponse = self
            .post_json(
                "chats/",
                &CreateChatRequest {
                    user: user_id.as_str(),
                    chatbot: character_id.as_str(),
                },
            )
            .await?;
        conversation_id(&created.id)
    }

    async fn load_messages(&self, id: &ConversationId) -> Result<Vec<Turn>, BackendError> {
        let detail: ChatDetailResponse = self.get_json(&format!("chats/{}/", id)).await?;
        Ok(detail
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(MessageDto::into_turn)
            .collect())
    }

    async fn persist_message(
        &self,
        id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), BackendError> {
        let actor = Some(message.actor_id.as_str());
        let body = NewMessageRequest {
            chat: id.as_str(),
            description: &message.content,
            sender_user: actor.filter(|_| message.role == Role::User),
            sender_bot: actor.filter(|_| message.role == Role::Assistant),
        };

        let path = format!("chats/{}/messages/", id);
        debug!("POST {}", path);
        self.send(self.client.post(self.url(&path)).json(&body))
            .await?;
        Ok(())
    }
}
