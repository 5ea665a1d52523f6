//! JunoChat REST backend adapter.
//!
//! [`HttpChatBackend`] implements the
//! [`ChatBackend`](juno_application::ChatBackend) port over the JunoChat
//! Django API using reqwest.

mod backend;
mod dto;

pub use backend::HttpChatBackend;
