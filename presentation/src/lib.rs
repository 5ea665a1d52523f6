//! Presentation layer for juno-chat
//!
//! This crate contains CLI definitions, the transcript formatter,
//! progress display, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, RerollModeArg};
pub use config::ReplConfig;
pub use output::console::TranscriptFormatter;
pub use progress::reporter::SpinnerObserver;
