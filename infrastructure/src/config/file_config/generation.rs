//! Reply generation configuration from TOML (`[generation]` section)

use super::backend::resolve_secret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which completion endpoint plays the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationProvider {
    /// OpenAI-compatible chat completions (OpenRouter)
    OpenRouter,
    /// Raw ChatML text generation (Hermes on Hugging Face inference)
    Hermes,
    /// Fixed greeting, no network
    Canned,
}

impl GenerationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationProvider::OpenRouter => "openrouter",
            GenerationProvider::Hermes => "hermes",
            GenerationProvider::Canned => "canned",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            GenerationProvider::OpenRouter => "https://openrouter.ai/api/v1",
            GenerationProvider::Hermes => {
                "https://api-inference.huggingface.co/models/NousResearch/Hermes-3-Llama-3.1-8B"
            }
            GenerationProvider::Canned => "",
        }
    }

    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            GenerationProvider::OpenRouter => Some("OPENROUTER_API_KEY"),
            GenerationProvider::Hermes => Some("HF_API_TOKEN"),
            GenerationProvider::Canned => None,
        }
    }
}

impl fmt::Display for GenerationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" | "open_router" => Ok(GenerationProvider::OpenRouter),
            "hermes" => Ok(GenerationProvider::Hermes),
            "canned" | "offline" => Ok(GenerationProvider::Canned),
            other => Err(other.to_string()),
        }
    }
}

/// Raw generation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// "openrouter", "hermes" or "canned"
    pub provider: String,
    /// Endpoint override; the provider default is used when unset
    pub base_url: Option<String>,
    /// Model id (OpenRouter only)
    pub model: String,
    /// Direct API key (not recommended, use an environment variable instead)
    pub api_key: Option<String>,
    /// Environment variable for the API key; provider default when unset
    pub api_key_env: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Hermes only
    pub repetition_penalty: f32,
    pub timeout_seconds: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            base_url: None,
            model: "nousresearch/hermes-3-llama-3.1-405b".to_string(),
            api_key: None,
            api_key_env: None,
            max_tokens: 200,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.1,
            timeout_seconds: 60,
        }
    }
}

impl FileGenerationConfig {
    /// Parse `provider`, returning the unknown value on failure
    pub fn parse_provider(&self) -> Result<GenerationProvider, String> {
        self.provider.parse()
    }

    pub fn resolved_base_url(&self, provider: GenerationProvider) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(provider.default_base_url())
            .to_string()
    }

    /// API key from the direct value, then `api_key_env`, then the provider's default variable.
    pub fn resolve_api_key(&self, provider: GenerationProvider) -> Option<String> {
        let env_name = self
            .api_key_env
            .as_deref()
            .or(provider.default_api_key_env());
        resolve_secret(self.api_key.as_deref(), env_name)
    }
}
