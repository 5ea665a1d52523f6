//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: `UserId`, `CharacterId`, `ConversationId`
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
