//! In-process adapters for running without a JunoChat server.

mod backend;

pub use backend::InMemoryChatBackend;
