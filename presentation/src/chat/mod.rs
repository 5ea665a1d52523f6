//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over a
//! [`ConversationSession`](juno_application::ConversationSession).

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
