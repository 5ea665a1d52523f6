//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like fields stay strings here and are parsed on use, so that
//! [`FileConfig::validate`] can report every bad value at once.

mod backend;
mod generation;
mod logging;
mod repl;
mod session;

pub use backend::FileBackendConfig;
pub use generation::{FileGenerationConfig, GenerationProvider};
pub use logging::{FileLoggingConfig, expand_home};
pub use repl::FileReplConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{section}.timeout_seconds cannot be 0")]
    InvalidTimeout { section: &'static str },

    #[error("{section}.base_url cannot be empty")]
    EmptyBaseUrl { section: &'static str },

    #[error("generation.provider: unknown value '{0}' (expected openrouter, hermes or canned)")]
    UnknownProvider(String),

    #[error("generation.model cannot be empty")]
    EmptyModelName,

    #[error("session.reroll_mode: unknown value '{0}' (expected insert or replace)")]
    UnknownRerollMode(String),

    #[error("generation.{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("generation.max_tokens cannot be 0")]
    ZeroMaxTokens,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// JunoChat REST backend
    pub backend: FileBackendConfig,
    /// Reply generation endpoint
    pub generation: FileGenerationConfig,
    /// Conversation view behavior
    pub session: FileSessionConfig,
    /// Diagnostic and transcript logs
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.backend.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout { section: "backend" });
        }
        if self.backend.base_url.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyBaseUrl { section: "backend" });
        }

        let generation = &self.generation;
        match generation.parse_provider() {
            Ok(GenerationProvider::Canned) => {}
            Ok(provider) => {
                if generation.resolved_base_url(provider).is_empty() {
                    errors.push(ConfigValidationError::EmptyBaseUrl {
                        section: "generation",
                    });
                }
                if provider == GenerationProvider::OpenRouter
                    && generation.model.trim().is_empty()
                {
                    errors.push(ConfigValidationError::EmptyModelName);
                }
            }
            Err(unknown) => errors.push(ConfigValidationError::UnknownProvider(unknown)),
        }
        if generation.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout {
                section: "generation",
            });
        }
        if generation.max_tokens == 0 {
            errors.push(ConfigValidationError::ZeroMaxTokens);
        }
        for (field, value, min, max) in [
            ("temperature", generation.temperature, 0.0, 2.0),
            ("top_p", generation.top_p, 0.0, 1.0),
            ("repetition_penalty", generation.repetition_penalty, 0.0, 2.0),
        ] {
            if !(min..=max).contains(&value) {
                errors.push(ConfigValidationError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        if self.session.parse_reroll_mode().is_err() {
            errors.push(ConfigValidationError::UnknownRerollMode(
                self.session.reroll_mode.clone(),
            ));
        }

        errors
    }
}
