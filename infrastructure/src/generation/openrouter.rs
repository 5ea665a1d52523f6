//! OpenRouterReplyGenerator - OpenAI-compatible chat completions.
//!
//! Works against OpenRouter or any endpoint speaking the same
//! `/chat/completions` dialect.

use super::{SamplingParams, bearer, http_client, send};
use async_trait::async_trait;
use juno_application::{GenerationError, ReplyGenerator};
use juno_domain::{Character, PersonaPrompt, Turn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct OpenRouterReplyGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    sampling: SamplingParams,
}

impl OpenRouterReplyGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
            sampling: SamplingParams::default(),
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    fn build_request<'a>(
        &'a self,
        transcript: &'a [Turn],
        character: &Character,
    ) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: PersonaPrompt::system(character).into(),
        });
        messages.extend(transcript.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: turn.content.as_str().into(),
        }));

        ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.sampling.max_tokens,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
        }
    }
}

#[async_trait]
impl ReplyGenerator for OpenRouterReplyGenerator {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate_reply(
        &self,
        transcript: &[Turn],
        character: &Character,
    ) -> Result<String, GenerationError> {
        let body = self.build_request(transcript, character);
        debug!(
            "Requesting chat completion from {} ({} messages)",
            self.model,
            body.messages.len()
        );

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        let response = send(bearer(request, self.api_key.as_deref())).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        extract_reply(parsed)
    }
}

fn extract_reply(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyReply)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use juno_domain::CharacterId;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn juno() -> Character {
        Character::new(CharacterId::from(1), "Juno").with_description("A space pilot.")
    }

    fn generator(server: &MockServer) -> OpenRouterReplyGenerator {
        OpenRouterReplyGenerator::new(
            format!("{}/api/v1/", server.uri()),
            "nousresearch/hermes-3-llama-3.1-405b",
            Duration::from_secs(5),
        )
        .unwrap()
        .with_api_key(Some("sk-or-test".to_string()))
    }

    #[tokio::test]
    async fn test_sends_persona_and_turns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-or-test"))
            .and(body_json(json!({
                "model": "nousresearch/hermes-3-llama-3.1-405b",
                "messages": [
                    {"role": "system", "content": "You are Juno. A space pilot. Always stay in character."},
                    {"role": "user", "content": "Hello"}
                ],
                "max_tokens": 200,
                "temperature": 0.7,
                "top_p": 0.9
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": " Hi there "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = generator(&server)
            .generate_reply(&[Turn::user("Hello")], &juno())
            .await
            .unwrap();
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate_reply(&[Turn::user("Hello")], &juno())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyReply));
    }

    #[tokio::test]
    async fn test_rate_limited_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate_reply(&[Turn::user("Hello")], &juno())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 429, .. }));
    }
}
