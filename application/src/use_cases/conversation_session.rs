//! Conversation Session: the controller behind one conversation view.
//!
//! Owns the transcript, the phase state machine, the error banner and a
//! single submission slot. The UI drives it through
//! [`open_conversation`](ConversationSession::open_conversation),
//! [`send_message`](ConversationSession::send_message) and the mutation
//! operations; each returns a [`SessionSnapshot`] to render.
//!
//! Remote failures never come back as `Err`: they land in the snapshot's
//! `error` banner, which stays until the next successful operation.
//! `Err` is reserved for calls the session refuses outright
//! ([`SessionError::Busy`], [`SessionError::NotReady`]).

use crate::config::SessionParams;
use crate::ports::chat_backend::ChatBackend;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::reply_generator::ReplyGenerator;
use crate::ports::session_observer::{NoSessionObserver, SessionObserver};
use crate::use_cases::append_turn::{AppendTurnInput, AppendTurnUseCase, SendReport};
use crate::use_cases::error::SessionError;
use crate::use_cases::load_history::LoadHistoryUseCase;
use crate::use_cases::reroll_turn::{RerollOutcome, RerollTurnUseCase};
use crate::use_cases::resolve_session::ResolveSessionUseCase;
use crate::use_cases::shared::TranscriptCell;
use juno_domain::{
    Character, CharacterId, Conversation, SessionPhase, Transcript, UserId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What the UI renders after every operation.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub conversation: Option<Conversation>,
    pub character: Option<Character>,
    pub transcript: Transcript,
    /// Persistent error banner
    pub error: Option<String>,
    /// Report of the most recent submission
    pub last_send: Option<SendReport>,
}

#[derive(Debug, Default)]
struct ViewState {
    phase: SessionPhase,
    conversation: Option<Conversation>,
    character: Option<Character>,
    error: Option<String>,
    last_send: Option<SendReport>,
}

pub struct ConversationSession {
    backend: Arc<dyn ChatBackend>,
    generator: Arc<dyn ReplyGenerator>,
    conversation_logger: Arc<dyn ConversationLogger>,
    observer: Arc<dyn SessionObserver>,
    params: SessionParams,
    transcript: TranscriptCell,
    state: Mutex<ViewState>,
    busy: AtomicBool,
}

/// Exclusive right to run a remote operation on the session.
///
/// Released on drop, including when the owning future is dropped mid-flight;
/// a view abandoned in a pending phase is put back where a retry can start.
struct SubmitSlot<'a> {
    session: &'a ConversationSession,
}

impl<'a> SubmitSlot<'a> {
    fn claim(session: &'a ConversationSession) -> Result<Self, SessionError> {
        session
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::Busy)?;
        Ok(Self { session })
    }
}

impl Drop for SubmitSlot<'_> {
    fn drop(&mut self) {
        match self.session.phase() {
            SessionPhase::Submitting => self.session.set_phase(SessionPhase::Ready),
            SessionPhase::ResolvingSession | SessionPhase::LoadingHistory => {
                self.session.set_phase(SessionPhase::Uninitialized)
            }
            SessionPhase::Uninitialized | SessionPhase::Ready => {}
        }
        self.session.busy.store(false, Ordering::Release);
    }
}

impl ConversationSession {
    pub fn new(backend: Arc<dyn ChatBackend>, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            backend,
            generator,
            conversation_logger: Arc::new(NoConversationLogger),
            observer: Arc::new(NoSessionObserver),
            params: SessionParams::default(),
            transcript: TranscriptCell::default(),
            state: Mutex::new(ViewState::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    /// Whether a remote operation currently holds the session
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let transcript = self.transcript.snapshot();
        let state = self.state();
        SessionSnapshot {
            phase: state.phase,
            conversation: state.conversation.clone(),
            character: state.character.clone(),
            transcript,
            error: state.error.clone(),
            last_send: state.last_send.clone(),
        }
    }

    // ==================== Opening ====================

    /// Resolve (or create) the conversation with a character and load its history.
    pub async fn open_conversation(
        &self,
        user_id: UserId,
        character_id: CharacterId,
    ) -> Result<SessionSnapshot, SessionError> {
        let _slot = SubmitSlot::claim(self)?;
        self.set_phase(SessionPhase::ResolvingSession);

        let character = match self.backend.fetch_character(&character_id).await {
            Ok(character) => character,
            Err(e) => return Ok(self.fail_open(e.into())),
        };

        let conversation = match ResolveSessionUseCase::new(self.backend.clone())
            .execute(&user_id, &character_id)
            .await
        {
            Ok(conversation) => conversation,
            Err(e) => return Ok(self.fail_open(e)),
        };

        self.set_phase(SessionPhase::LoadingHistory);
        let history = match LoadHistoryUseCase::new(self.backend.clone())
            .execute(&conversation.id)
            .await
        {
            Ok(history) => history,
            Err(e) => return Ok(self.fail_open(e)),
        };

        info!(
            "Opened conversation {} with {} ({} turns)",
            conversation.id,
            character.name,
            history.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "conversation_opened",
            serde_json::json!({
                "conversation_id": conversation.id.as_str(),
                "user_id": conversation.user_id.as_str(),
                "character_id": conversation.character_id.as_str(),
                "turns": history.len(),
            }),
        ));

        self.transcript.replace(history);
        {
            let mut state = self.state();
            state.conversation = Some(conversation);
            state.character = Some(character);
            state.error = None;
            state.last_send = None;
        }
        self.set_phase(SessionPhase::Ready);

        Ok(self.snapshot())
    }

    fn fail_open(&self, error: SessionError) -> SessionSnapshot {
        warn!("Could not open conversation: {}", error);
        self.transcript.replace(Transcript::new());
        {
            let mut state = self.state();
            state.conversation = None;
            state.character = None;
            state.error = Some(error.to_string());
        }
        self.set_phase(SessionPhase::Uninitialized);
        self.snapshot()
    }

    // ==================== Submitting ====================

    /// Send a user message and wait for the character's reply.
    ///
    /// Blank input is a silent no-op. The user turn is in the transcript
    /// before the first remote call is made.
    pub async fn send_message(&self, text: &str) -> Result<SessionSnapshot, SessionError> {
        if text.trim().is_empty() {
            debug!("Ignoring blank message");
            return Ok(self.snapshot());
        }

        let _slot = SubmitSlot::claim(self)?;
        let (conversation, character) = self.ready_context()?;
        self.set_phase(SessionPhase::Submitting);

        let result = AppendTurnUseCase::new(self.backend.clone(), self.generator.clone())
            .with_conversation_logger(self.conversation_logger.clone())
            .execute(
                &self.transcript,
                AppendTurnInput::new(conversation, character, text),
                self.observer.as_ref(),
            )
            .await;

        match result {
            Ok(report) => {
                let mut state = self.state();
                state.error = report.error().map(ToString::to_string);
                state.last_send = Some(report);
            }
            Err(e) => debug!("Submission ignored: {}", e),
        }
        self.set_phase(SessionPhase::Ready);

        Ok(self.snapshot())
    }

    /// Regenerate the assistant turn at `index`.
    ///
    /// A bad index, a non-assistant target or a missing preceding user turn
    /// is a silent no-op.
    pub async fn reroll_message(&self, index: usize) -> Result<SessionSnapshot, SessionError> {
        let _slot = SubmitSlot::claim(self)?;
        let (_, character) = self.ready_context()?;
        self.set_phase(SessionPhase::Submitting);

        let result = RerollTurnUseCase::new(self.generator.clone())
            .with_conversation_logger(self.conversation_logger.clone())
            .execute(
                &self.transcript,
                &character,
                index,
                self.params.reroll_mode,
                self.observer.as_ref(),
            )
            .await;

        match result {
            Ok(RerollOutcome::Rerolled { .. }) => self.state().error = None,
            Ok(RerollOutcome::Discarded) => {}
            Err(e) if e.is_remote() => self.state().error = Some(e.to_string()),
            Err(e) => debug!("Reroll of turn {} skipped: {}", index, e),
        }
        self.set_phase(SessionPhase::Ready);

        Ok(self.snapshot())
    }

    // ==================== Local mutations ====================

    /// Replace the content of the turn at `index`. Out of range is a silent no-op.
    pub fn edit_message(&self, index: usize, text: &str) -> SessionSnapshot {
        match self.transcript.edit(index, text) {
            Ok(()) => self.state().error = None,
            Err(e) => debug!("Ignoring edit: {}", e),
        }
        self.snapshot()
    }

    /// Remove the turn at `index`. Out of range is a silent no-op.
    pub fn delete_message(&self, index: usize) -> SessionSnapshot {
        match self.transcript.remove(index) {
            Ok(_) => self.state().error = None,
            Err(e) => debug!("Ignoring delete: {}", e),
        }
        self.snapshot()
    }

    // ==================== Internals ====================

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.state().phase = phase;
        self.observer.on_phase_changed(phase);
    }

    fn ready_context(&self) -> Result<(Conversation, Character), SessionError> {
        let state = self.state();
        match (state.phase, &state.conversation, &state.character) {
            (SessionPhase::Ready, Some(conversation), Some(character)) => {
                Ok((conversation.clone(), character.clone()))
            }
            _ => Err(SessionError::NotReady),
        }
    }
}
