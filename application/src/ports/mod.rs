//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters implement.

pub mod chat_backend;
pub mod conversation_logger;
pub mod reply_generator;
pub mod session_observer;
