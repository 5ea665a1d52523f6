//! Domain layer for juno-chat
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Turn**: one role-tagged message (user, assistant or system)
//! - **Transcript**: the ordered turns of one conversation view; turns are
//!   appended, edited, removed or rerolled, never reordered
//! - **Conversation**: the persistent pairing of one user and one character
//! - **Character**: the persona a reply generator plays

pub mod conversation;
pub mod core;
pub mod prompt;

// Re-export commonly used types
pub use conversation::{
    entities::{Character, Conversation},
    phase::SessionPhase,
    reroll::RerollMode,
    transcript::Transcript,
    turn::{Role, Turn},
};
pub use core::{
    error::DomainError,
    ids::{CharacterId, ConversationId, UserId},
};
pub use prompt::PersonaPrompt;
