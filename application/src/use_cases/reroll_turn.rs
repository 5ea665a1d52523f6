//! Reroll Turn use case.
//!
//! Regenerates an assistant turn by resupplying the transcript up to the
//! nearest preceding user turn. Local-only: the new reply is not persisted.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::reply_generator::ReplyGenerator;
use crate::ports::session_observer::SessionObserver;
use crate::use_cases::error::SessionError;
use crate::use_cases::shared::TranscriptCell;
use juno_domain::{Character, RerollMode, Turn};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerollOutcome {
    /// The reply was placed according to the reroll mode
    Rerolled { index: usize, reply: Turn },
    /// The target moved or vanished while the reply was pending
    Discarded,
}

pub struct RerollTurnUseCase {
    generator: Arc<dyn ReplyGenerator>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RerollTurnUseCase {
    pub fn new(generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            generator,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Reroll the assistant turn at `index`.
    ///
    /// - `InvalidInput` if `index` is out of range or not an assistant turn
    /// - `NotFound` if no user turn precedes it
    /// - `RemoteUnavailable` if generation fails (transcript untouched)
    pub async fn execute(
        &self,
        transcript: &TranscriptCell,
        character: &Character,
        index: usize,
        mode: RerollMode,
        observer: &dyn SessionObserver,
    ) -> Result<RerollOutcome, SessionError> {
        let ticket = transcript.reroll_prompt(index)?;
        debug!(
            "Rerolling turn {} with a {}-turn prompt ({})",
            index,
            ticket.prompt.len(),
            mode
        );

        observer.on_generation_started(character);
        let generated = self.generator.generate_reply(&ticket.prompt, character).await;
        observer.on_generation_finished(generated.is_ok());
        let content = generated?;

        if let Err(e) = transcript.apply_reroll(&ticket, content.clone(), mode) {
            warn!("Discarding rerolled reply for turn {}: {}", index, e);
            return Ok(RerollOutcome::Discarded);
        }

        let placed_at = match mode {
            RerollMode::Insert => index + 1,
            RerollMode::Replace => index,
        };
        let reply = Turn::assistant(content);
        observer.on_turn_appended(placed_at, &reply);

        self.conversation_logger.log(ConversationEvent::new(
            "turn_rerolled",
            serde_json::json!({
                "character_id": character.id.as_str(),
                "index": placed_at,
                "mode": mode.as_str(),
                "content": reply.content,
            }),
        ));

        Ok(RerollOutcome::Rerolled {
            index: placed_at,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::session_observer::NoSessionObserver;
    use crate::use_cases::test_support::{MockGenerator, character};
    use juno_domain::Transcript;

    fn transcript() -> TranscriptCell {
        TranscriptCell::new(Transcript::from_turns(vec![
            Turn::user("hi"),
            Turn::assistant("hello"),
            Turn::user("tell me a joke"),
            Turn::assistant("no"),
        ]))
    }

    #[tokio::test]
    async fn test_insert_after_target() {
        let cell = transcript();
        let generator = Arc::new(MockGenerator::replying(&["why did the rustacean..."]));

        let outcome = RerollTurnUseCase::new(generator.clone())
            .execute(&cell, &character(), 3, RerollMode::Insert, &NoSessionObserver)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RerollOutcome::Rerolled {
                index: 4,
                reply: Turn::assistant("why did the rustacean...")
            }
        );
        let turns = cell.snapshot().into_turns();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[3], Turn::assistant("no"));

        // Prompt stops at the nearest preceding user turn
        let seen = generator.seen();
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0].last(), Some(&Turn::user("tell me a joke")));
    }

    #[tokio::test]
    async fn test_insert_leaves_later_turns_in_place() {
        let cell = transcript();
        let generator = Arc::new(MockGenerator::replying(&["hey"]));

        RerollTurnUseCase::new(generator)
            .execute(&cell, &character(), 1, RerollMode::Insert, &NoSessionObserver)
            .await
            .unwrap();

        let turns = cell.snapshot().into_turns();
        assert_eq!(
            turns,
            vec![
                Turn::user("hi"),
                Turn::assistant("hello"),
                Turn::assistant("hey"),
                Turn::user("tell me a joke"),
                Turn::assistant("no"),
            ]
        );
    }

    #[tokio::test]
    async fn test_replace_mode() {
        let cell = transcript();
        let generator = Arc::new(MockGenerator::replying(&["fine, one joke"]));

        RerollTurnUseCase::new(generator)
            .execute(&cell, &character(), 3, RerollMode::Replace, &NoSessionObserver)
            .await
            .unwrap();

        let turns = cell.snapshot().into_turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[3], Turn::assistant("fine, one joke"));
    }

    #[tokio::test]
    async fn test_user_target_is_invalid() {
        let cell = TranscriptCell::new(Transcript::from_turns(vec![Turn::user("hi")]));
        let generator = Arc::new(MockGenerator::replying(&["unused"]));

        let err = RerollTurnUseCase::new(generator.clone())
            .execute(&cell, &character(), 0, RerollMode::Insert, &NoSessionObserver)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert_eq!(cell.snapshot().turns(), &[Turn::user("hi")]);
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn test_no_preceding_user_turn_is_not_found() {
        let cell = TranscriptCell::new(Transcript::from_turns(vec![Turn::assistant("greeting")]));
        let generator = Arc::new(MockGenerator::replying(&["unused"]));

        let err = RerollTurnUseCase::new(generator.clone())
            .execute(&cell, &character(), 0, RerollMode::Insert, &NoSessionObserver)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::NotFound(_)));
        assert_eq!(cell.len(), 1);
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn test_target_removed_while_pending_is_discarded() {
        let cell = Arc::new(transcript());
        let generator = Arc::new(MockGenerator::replying(&["late"]).gated());

        let pending = tokio::spawn({
            let cell = cell.clone();
            let generator = generator.clone();
            async move {
                RerollTurnUseCase::new(generator)
                    .execute(&cell, &character(), 1, RerollMode::Replace, &NoSessionObserver)
                    .await
            }
        });
        for _ in 0..1000 {
            if !generator.seen().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }

        cell.remove(0).unwrap();
        cell.remove(0).unwrap();
        generator.release();

        assert_eq!(pending.await.unwrap().unwrap(), RerollOutcome::Discarded);
        assert_eq!(
            cell.snapshot().into_turns(),
            vec![Turn::user("tell me a joke"), Turn::assistant("no")]
        );
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_transcript() {
        let cell = transcript();
        let generator = Arc::new(MockGenerator::failing());

        let err = RerollTurnUseCase::new(generator)
            .execute(&cell, &character(), 1, RerollMode::Insert, &NoSessionObserver)
            .await
            .unwrap_err();

        assert!(err.is_remote());
        assert_eq!(cell.len(), 4);
    }
}
