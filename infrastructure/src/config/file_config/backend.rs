//! Backend configuration from TOML (`[backend]` section)

use serde::{Deserialize, Serialize};

/// Raw JunoChat backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the REST API (trailing slash optional)
    pub base_url: String,
    /// Auth token sent as `Authorization: Token <token>`
    pub token: Option<String>,
    /// Environment variable consulted when `token` is unset
    pub token_env: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            token: None,
            token_env: "JUNOCHAT_TOKEN".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl FileBackendConfig {
    /// Token from the direct value, then from `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        resolve_secret(self.token.as_deref(), Some(&self.token_env))
    }
}

/// Direct value first, then the named environment variable. Blank counts as unset.
pub(super) fn resolve_secret(direct: Option<&str>, env_name: Option<&str>) -> Option<String> {
    direct
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            env_name
                .and_then(|name| std::env::var(name).ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_token_wins() {
        let config = FileBackendConfig {
            token: Some("abc".to_string()),
            token_env: "JUNO_TEST_TOKEN_UNSET_0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_token(), Some("abc".to_string()));
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = FileBackendConfig {
            token: Some("   ".to_string()),
            token_env: "JUNO_TEST_TOKEN_UNSET_1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_token(), None);
    }
}
