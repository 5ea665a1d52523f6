//! HermesReplyGenerator - raw ChatML text generation.
//!
//! Targets Hugging Face style inference endpoints: the whole conversation is
//! rendered into one ChatML prompt and the reply is cut back out of the
//! generated text.

use super::{SamplingParams, bearer, http_client, send};
use async_trait::async_trait;
use juno_application::{GenerationError, ReplyGenerator};
use juno_domain::{Character, PersonaPrompt, Turn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct HermesReplyGenerator {
    client: Client,
    url: String,
    api_token: Option<String>,
    sampling: SamplingParams,
}

impl HermesReplyGenerator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
            api_token: None,
            sampling: SamplingParams::default(),
        })
    }

    pub fn with_api_token(mut self, api_token: Option<String>) -> Self {
        self.api_token = api_token;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

#[async_trait]
impl ReplyGenerator for HermesReplyGenerator {
    fn name(&self) -> &str {
        "hermes"
    }

    async fn generate_reply(
        &self,
        transcript: &[Turn],
        character: &Character,
    ) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            inputs: PersonaPrompt::chatml(character, transcript),
            parameters: GenerateParameters {
                max_new_tokens: self.sampling.max_tokens,
                temperature: self.sampling.temperature,
                top_p: self.sampling.top_p,
                repetition_penalty: self.sampling.repetition_penalty,
                stop: [PersonaPrompt::CHATML_STOP],
            },
        };
        debug!("Requesting ChatML generation ({} bytes)", body.inputs.len());

        let request = self.client.post(&self.url).json(&body);
        let response = send(bearer(request, self.api_token.as_deref())).await?;

        let generated: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        generated
            .first()
            .and_then(|g| PersonaPrompt::extract_chatml_reply(&g.generated_text))
            .ok_or(GenerationError::EmptyReply)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    inputs: String,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    stop: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}
