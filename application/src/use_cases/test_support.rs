//! Scripted port doubles shared by the use case tests.

use crate::ports::chat_backend::{BackendError, ChatBackend, OutgoingMessage};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::reply_generator::{GenerationError, ReplyGenerator};
use async_trait::async_trait;
use juno_domain::{Character, CharacterId, ConversationId, Turn, UserId};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;

pub(crate) fn ids() -> (UserId, CharacterId) {
    (UserId::new("u1").unwrap(), CharacterId::new("c1").unwrap())
}

pub(crate) fn character() -> Character {
    Character::new(CharacterId::new("c1").unwrap(), "Juno").with_description("A space pilot.")
}

// ==================== Backend ====================

pub(crate) struct MockBackend {
    first: Option<ConversationId>,
    created: ConversationId,
    messages: Vec<Turn>,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<String>>,
    persisted: Mutex<Vec<(ConversationId, OutgoingMessage)>>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            first: Some(ConversationId::from(1)),
            created: ConversationId::from(99),
            messages: Vec::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            persisted: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_first(mut self, first: Option<ConversationId>) -> Self {
        self.first = first;
        self
    }

    pub(crate) fn with_messages(mut self, messages: Vec<Turn>) -> Self {
        self.messages = messages;
        self
    }

    /// Make an operation fail: "character", "resolve", "create", "load",
    /// "persist_user" or "persist_assistant".
    pub(crate) fn failing(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    pub(crate) fn created_id(&self) -> ConversationId {
        self.created.clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub(crate) fn persisted(&self) -> Vec<(ConversationId, OutgoingMessage)> {
        self.persisted.lock().unwrap().clone()
    }

    fn record(&self, call: String, op: &'static str) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(op) {
            return Err(BackendError::Connection(format!("{op} refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn fetch_character(&self, id: &CharacterId) -> Result<Character, BackendError> {
        self.record(format!("character:{id}"), "character")?;
        Ok(character())
    }

    async fn resolve_first_conversation(
        &self,
        _user_id: &UserId,
        _character_id: &CharacterId,
    ) -> Result<Option<ConversationId>, BackendError> {
        self.record("resolve".to_string(), "resolve")?;
        Ok(self.first.clone())
    }

    async fn create_conversation(
        &self,
        _user_id: &UserId,
        _character_id: &CharacterId,
    ) -> Result<ConversationId, BackendError> {
        self.record("create".to_string(), "create")?;
        Ok(self.created.clone())
    }

    async fn load_messages(&self, id: &ConversationId) -> Result<Vec<Turn>, BackendError> {
        self.record(format!("load:{id}"), "load")?;
        Ok(self.messages.clone())
    }

    async fn persist_message(
        &self,
        id: &ConversationId,
        message: &OutgoingMessage,
    ) -> Result<(), BackendError> {
        let op = if message.role == juno_domain::Role::User {
            "persist_user"
        } else {
            "persist_assistant"
        };
        self.record(format!("{op}:{}", message.content), op)?;
        self.persisted
            .lock()
            .unwrap()
            .push((id.clone(), message.clone()));
        Ok(())
    }
}

// ==================== Generator ====================

pub(crate) struct MockGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    seen: Mutex<Vec<Vec<Turn>>>,
    gate: Option<Notify>,
}

impl MockGenerator {
    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            seen: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(vec![Err(GenerationError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })])),
            seen: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every call until [`MockGenerator::release`] is called.
    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) fn seen(&self) -> Vec<Vec<Turn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_reply(
        &self,
        transcript: &[Turn],
        _character: &Character,
    ) -> Result<String, GenerationError> {
        self.seen.lock().unwrap().push(transcript.to_vec());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyReply))
    }
}

// ==================== Logger ====================

#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub(crate) fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}
