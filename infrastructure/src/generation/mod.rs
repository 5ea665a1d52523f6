//! Reply generation adapters.
//!
//! Each adapter implements the
//! [`ReplyGenerator`](juno_application::ReplyGenerator) port:
//!
//! - [`OpenRouterReplyGenerator`]: OpenAI-compatible chat completions
//! - [`HermesReplyGenerator`]: raw ChatML text generation
//! - [`CannedReplyGenerator`]: fixed greeting for offline use

mod canned;
mod hermes;
mod openrouter;

pub use canned::CannedReplyGenerator;
pub use hermes::HermesReplyGenerator;
pub use openrouter::OpenRouterReplyGenerator;

use juno_application::GenerationError;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Sampling parameters shared by the HTTP generators
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.1,
        }
    }
}

fn http_client(timeout: Duration) -> Result<Client, GenerationError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GenerationError::Connection(e.to_string()))
}

fn bearer(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Send and turn transport failures and non-2xx statuses into [`GenerationError`].
async fn send(request: RequestBuilder) -> Result<Response, GenerationError> {
    let response = request
        .send()
        .await
        .map_err(|e| GenerationError::Connection(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GenerationError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
