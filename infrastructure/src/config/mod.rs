//! Configuration file loading for juno-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `JUNO_` environment variables (`JUNO_BACKEND__BASE_URL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./juno.toml` or `./.juno.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/juno-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileGenerationConfig,
    FileLoggingConfig, FileReplConfig, FileSessionConfig, GenerationProvider, expand_home,
};
pub use loader::ConfigLoader;
