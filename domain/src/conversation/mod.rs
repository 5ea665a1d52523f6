//! Conversation domain.
//!
//! - [`turn::Turn`]: a single role-tagged message
//! - [`transcript::Transcript`]: the ordered turns of one conversation view
//! - [`entities::Conversation`] / [`entities::Character`]: who is talking
//! - [`phase::SessionPhase`]: view lifecycle
//! - [`reroll::RerollMode`]: placement of regenerated replies

pub mod entities;
pub mod phase;
pub mod reroll;
pub mod transcript;
pub mod turn;
