//! Session configuration from TOML (`[session]` section)

use juno_application::SessionParams;
use juno_domain::{DomainError, RerollMode};
use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Where a rerolled reply goes: "insert" (after the original) or "replace"
    pub reroll_mode: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            reroll_mode: RerollMode::default().as_str().to_string(),
        }
    }
}

impl FileSessionConfig {
    pub fn parse_reroll_mode(&self) -> Result<RerollMode, DomainError> {
        self.reroll_mode.parse()
    }

    /// Convert to [`SessionParams`], falling back to the default reroll mode.
    pub fn to_session_params(&self) -> SessionParams {
        SessionParams::default().with_reroll_mode(self.parse_reroll_mode().unwrap_or_default())
    }
}
