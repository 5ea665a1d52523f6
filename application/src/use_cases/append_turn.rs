//! Append Turn use case.
//!
//! The submission pipeline of a conversation view:
//! 1. append the user turn locally (before any remote call)
//! 2. persist it, tagged with the user id
//! 3. ask the reply generator for exactly one reply
//! 4. persist the reply, tagged with the character id, then append it
//!
//! A failure stops the pipeline. Nothing already appended is rolled back.

use crate::ports::chat_backend::{ChatBackend, OutgoingMessage};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::reply_generator::ReplyGenerator;
use crate::ports::session_observer::SessionObserver;
use crate::use_cases::error::SessionError;
use crate::use_cases::shared::TranscriptCell;
use juno_domain::{Character, Conversation, Turn};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Furthest point a submission reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStage {
    /// User turn is in the local transcript
    Appended,
    /// User turn is stored remotely
    Persisted,
    /// Assistant reply is stored remotely and in the local transcript
    Replied,
}

/// The remote call a submission failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStep {
    PersistUser,
    GenerateReply,
    PersistReply,
}

impl SendStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStep::PersistUser => "persist_user",
            SendStep::GenerateReply => "generate_reply",
            SendStep::PersistReply => "persist_reply",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFailure {
    pub step: SendStep,
    pub error: SessionError,
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub stage: SendStage,
    /// The assistant turn, once appended
    pub reply: Option<Turn>,
    pub failure: Option<SendFailure>,
}

impl SendReport {
    fn reached(stage: SendStage) -> Self {
        Self {
            stage,
            reply: None,
            failure: None,
        }
    }

    fn failed(stage: SendStage, step: SendStep, error: SessionError) -> Self {
        Self {
            stage,
            reply: None,
            failure: Some(SendFailure { step, error }),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage == SendStage::Replied && self.failure.is_none()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.failure.as_ref().map(|f| &f.error)
    }
}

/// Input for the [`AppendTurnUseCase`].
#[derive(Debug, Clone)]
pub struct AppendTurnInput {
    pub conversation: Conversation,
    pub character: Character,
    /// Raw user input; stored as typed, only checked for emptiness after trimming.
    pub text: String,
}

impl AppendTurnInput {
    pub fn new(conversation: Conversation, character: Character, text: impl Into<String>) -> Self {
        Self {
            conversation,
            character,
            text: text.into(),
        }
    }
}

pub struct AppendTurnUseCase {
    backend: Arc<dyn ChatBackend>,
    generator: Arc<dyn ReplyGenerator>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AppendTurnUseCase {
    pub fn new(backend: Arc<dyn ChatBackend>, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            backend,
            generator,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the submission pipeline against `transcript`.
    ///
    /// Returns `Err(InvalidInput)` without touching anything when the text is
    /// blank. Remote failures are reported in the [`SendReport`], not as `Err`.
    pub async fn execute(
        &self,
        transcript: &TranscriptCell,
        input: AppendTurnInput,
        observer: &dyn SessionObserver,
    ) -> Result<SendReport, SessionError> {
        if input.text.trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "message cannot be empty".to_string(),
            ));
        }

        let conversation = &input.conversation;
        let character = &input.character;

        // 1. Optimistic append
        let user_turn = Turn::user(input.text);
        let index = transcript.push(user_turn.clone());
        observer.on_turn_appended(index, &user_turn);
        self.log_turn(conversation, &user_turn);

        // 2. Persist user turn
        let outgoing = OutgoingMessage::from_user(&user_turn, &conversation.user_id);
        if let Err(e) = self.backend.persist_message(&conversation.id, &outgoing).await {
            return Ok(self.fail(
                conversation,
                SendStage::Appended,
                SendStep::PersistUser,
                e.into(),
            ));
        }

        // 3. Generate reply from the full transcript
        let prompt = transcript.snapshot();
        debug!(
            "Requesting reply from {} with {} turns",
            self.generator.name(),
            prompt.len()
        );
        observer.on_generation_started(character);
        let generated = self.generator.generate_reply(prompt.turns(), character).await;
        observer.on_generation_finished(generated.is_ok());
        let content = match generated {
            Ok(content) => content,
            Err(e) => {
                return Ok(self.fail(
                    conversation,
                    SendStage::Persisted,
                    SendStep::GenerateReply,
                    e.into(),
                ));
            }
        };

        // 4. Persist, then append the reply
        let reply = Turn::assistant(content);
        let outgoing = OutgoingMessage::from_character(&reply, &conversation.character_id);
        if let Err(e) = self.backend.persist_message(&conversation.id, &outgoing).await {
            return Ok(self.fail(
                conversation,
                SendStage::Persisted,
                SendStep::PersistReply,
                e.into(),
            ));
        }

        let index = transcript.push(reply.clone());
        observer.on_turn_appended(index, &reply);
        self.log_turn(conversation, &reply);

        let mut report = SendReport::reached(SendStage::Replied);
        report.reply = Some(reply);
        Ok(report)
    }

    fn fail(
        &self,
        conversation: &Conversation,
        stage: SendStage,
        step: SendStep,
        error: SessionError,
    ) -> SendReport {
        warn!(
            "Send in conversation {} failed at {}: {}",
            conversation.id,
            step.as_str(),
            error
        );
        self.conversation_logger.log(ConversationEvent::new(
            "reply_failed",
            serde_json::json!({
                "conversation_id": conversation.id.as_str(),
                "step": step.as_str(),
                "error": error.to_string(),
            }),
        ));
        SendReport::failed(stage, step, error)
    }

    fn log_turn(&self, conversation: &Conversation, turn: &Turn) {
        self.conversation_logger.log(ConversationEvent::new(
            "turn_appended",
            serde_json::json!({
                "conversation_id": conversation.id.as_str(),
                "role": turn.role.as_str(),
                "content": turn.content,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::session_observer::NoSessionObserver;
    use crate::use_cases::test_support::{MockBackend, MockGenerator, RecordingLogger, character};
    use juno_domain::{CharacterId, ConversationId, Role, UserId};

    fn conversation() -> Conversation {
        Conversation::new(
            ConversationId::from(1),
            UserId::new("u1").unwrap(),
            CharacterId::new("c1").unwrap(),
        )
    }

    fn input(text: &str) -> AppendTurnInput {
        AppendTurnInput::new(conversation(), character(), text)
    }

    #[tokio::test]
    async fn test_hello_hi_there() {
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::replying(&["Hi there"]));
        let use_case = AppendTurnUseCase::new(backend.clone(), generator.clone());
        let transcript = TranscriptCell::default();

        let report = use_case
            .execute(&transcript, input("Hello"), &NoSessionObserver)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.reply, Some(Turn::assistant("Hi there")));
        assert_eq!(
            transcript.snapshot().turns(),
            &[Turn::user("Hello"), Turn::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_effects() {
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::replying(&["unused"]));
        let use_case = AppendTurnUseCase::new(backend.clone(), generator.clone());
        let transcript = TranscriptCell::default();

        for text in ["", "   ", "\n\t"] {
            let err = use_case
                .execute(&transcript, input(text), &NoSessionObserver)
                .await
                .unwrap_err();
            assert!(matches!(err, SessionError::InvalidInput(_)));
        }

        assert!(transcript.is_empty());
        assert!(backend.calls().is_empty());
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn test_generator_sees_new_user_turn() {
        let history = vec![Turn::user("hi"), Turn::assistant("hello")];
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::replying(&["fine"]));
        let use_case = AppendTurnUseCase::new(backend, generator.clone());
        let transcript = TranscriptCell::new(history.into());

        use_case
            .execute(&transcript, input("how are you?"), &NoSessionObserver)
            .await
            .unwrap();

        let seen = generator.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0][2], Turn::user("how are you?"));
    }

    #[tokio::test]
    async fn test_turns_are_persisted_with_actor_tags() {
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::replying(&["Hi there"]));
        let use_case = AppendTurnUseCase::new(backend.clone(), generator);

        use_case
            .execute(&TranscriptCell::default(), input("Hello"), &NoSessionObserver)
            .await
            .unwrap();

        let persisted = backend.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].0.as_str(), "1");
        assert_eq!(persisted[0].1.role, Role::User);
        assert_eq!(persisted[0].1.actor_id, "u1");
        assert_eq!(persisted[1].1.role, Role::Assistant);
        assert_eq!(persisted[1].1.actor_id, "c1");
        assert_eq!(
            backend.calls(),
            vec!["persist_user:Hello", "persist_assistant:Hi there"]
        );
    }

    #[tokio::test]
    async fn test_input_is_stored_untrimmed() {
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::replying(&["ok"]));
        let transcript = TranscriptCell::default();

        AppendTurnUseCase::new(backend, generator)
            .execute(&transcript, input("  spaced  "), &NoSessionObserver)
            .await
            .unwrap();

        assert_eq!(transcript.snapshot().turns()[0].content, "  spaced  ");
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_user_turn() {
        let backend = Arc::new(MockBackend::new());
        let generator = Arc::new(MockGenerator::failing());
        let transcript = TranscriptCell::default();

        let report = AppendTurnUseCase::new(backend.clone(), generator)
            .execute(&transcript, input("Hello"), &NoSessionObserver)
            .await
            .unwrap();

        assert_eq!(report.stage, SendStage::Persisted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.step, SendStep::GenerateReply);
        assert!(failure.error.is_remote());
        assert_eq!(transcript.snapshot().turns(), &[Turn::user("Hello")]);
        assert_eq!(backend.count("persist_assistant"), 0);
    }

    #[tokio::test]
    async fn test_persist_user_failure_stops_pipeline() {
        let backend = Arc::new(MockBackend::new().failing("persist_user"));
        let generator = Arc::new(MockGenerator::replying(&["unused"]));
        let transcript = TranscriptCell::default();

        let report = AppendTurnUseCase::new(backend, generator.clone())
            .execute(&transcript, input("Hello"), &NoSessionObserver)
            .await
            .unwrap();

        assert_eq!(report.stage, SendStage::Appended);
        assert_eq!(report.failure.unwrap().step, SendStep::PersistUser);
        assert!(generator.seen().is_empty());
        assert_eq!(transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_persist_reply_failure_drops_reply() {
        let backend = Arc::new(MockBackend::new().failing("persist_assistant"));
        let generator = Arc::new(MockGenerator::replying(&["Hi there"]));
        let transcript = TranscriptCell::default();
        let logger = Arc::new(RecordingLogger::default());

        let report = AppendTurnUseCase::new(backend, generator)
            .with_conversation_logger(logger.clone())
            .execute(&transcript, input("Hello"), &NoSessionObserver)
            .await
            .unwrap();

        assert_eq!(report.stage, SendStage::Persisted);
        assert_eq!(report.failure.unwrap().step, SendStep::PersistReply);
        assert_eq!(transcript.snapshot().turns(), &[Turn::user("Hello")]);
        assert_eq!(logger.event_types(), vec!["turn_appended", "reply_failed"]);
    }
}
