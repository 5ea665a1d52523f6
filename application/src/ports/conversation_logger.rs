//! Port for structured transcript logging.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! this port records what was said in each conversation in a
//! machine-readable form (JSONL in the default adapter).

use serde_json::Value;

/// One logged conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "turn_appended", "reply_failed").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Records conversation events.
///
/// `log` is synchronous and infallible; a broken log must never interrupt a chat.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
