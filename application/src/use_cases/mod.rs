//! Use cases
//!
//! Application-level operations that orchestrate domain logic through the ports.

pub mod append_turn;
pub mod conversation_session;
pub mod error;
pub mod load_history;
pub mod reroll_turn;
pub mod resolve_session;
pub mod shared;

#[cfg(test)]
mod test_support;
