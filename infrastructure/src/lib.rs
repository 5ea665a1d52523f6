//! Infrastructure layer for juno-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod generation;
pub mod http;
pub mod logging;
pub mod memory;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileGenerationConfig,
    FileLoggingConfig, FileReplConfig, FileSessionConfig, GenerationProvider,
};
pub use generation::{
    CannedReplyGenerator, HermesReplyGenerator, OpenRouterReplyGenerator, SamplingParams,
};
pub use http::HttpChatBackend;
pub use logging::JsonlConversationLogger;
pub use memory::InMemoryChatBackend;
