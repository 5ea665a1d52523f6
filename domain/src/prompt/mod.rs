//! Prompt domain
//!
//! Persona templates used by reply generators to put a model in character.

mod template;

pub use template::PersonaPrompt;
