//! Shared state for use cases.
//!
//! [`TranscriptCell`] is the transcript a conversation view owns. Use cases
//! mutate it between remote calls; a lock is only ever held for the duration
//! of a single in-memory mutation, never across an await.

use juno_domain::{DomainError, RerollMode, Transcript, Turn};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    transcript: Transcript,
    /// Bumped whenever turns are added, removed or replaced wholesale,
    /// i.e. whenever an index may start pointing at a different turn.
    layout: u64,
}

#[derive(Debug, Default)]
pub struct TranscriptCell {
    inner: Mutex<Inner>,
}

/// A reroll in flight: the prompt to regenerate from, plus what the target
/// looked like when the prompt was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerollTicket {
    pub index: usize,
    pub prompt: Vec<Turn>,
    target: Turn,
    layout: u64,
}

impl TranscriptCell {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            inner: Mutex::new(Inner {
                transcript,
                layout: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic mid-mutation cannot leave a Transcript half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current transcript
    pub fn snapshot(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().transcript.is_empty()
    }

    pub fn replace(&self, transcript: Transcript) {
        let mut inner = self.lock();
        inner.transcript = transcript;
        inner.layout += 1;
    }

    /// Append a turn and return its index
    pub fn push(&self, turn: Turn) -> usize {
        let mut inner = self.lock();
        inner.transcript.push(turn);
        inner.layout += 1;
        inner.transcript.len() - 1
    }

    pub fn edit(&self, index: usize, content: impl Into<String>) -> Result<(), DomainError> {
        self.lock().transcript.edit(index, content)
    }

    pub fn remove(&self, index: usize) -> Result<Turn, DomainError> {
        let mut inner = self.lock();
        let removed = inner.transcript.remove(index)?;
        inner.layout += 1;
        Ok(removed)
    }

    pub fn reroll_prompt(&self, index: usize) -> Result<RerollTicket, DomainError> {
        let inner = self.lock();
        let prompt = inner.transcript.reroll_prompt(index)?.to_vec();
        let target = inner
            .transcript
            .get(index)
            .cloned()
            .ok_or(DomainError::IndexOutOfRange {
                index,
                len: inner.transcript.len(),
            })?;
        Ok(RerollTicket {
            index,
            prompt,
            target,
            layout: inner.layout,
        })
    }

    /// Place the reply for `ticket`, unless the target turn was moved, removed
    /// or changed since the prompt was taken.
    pub fn apply_reroll(
        &self,
        ticket: &RerollTicket,
        reply: impl Into<String>,
        mode: RerollMode,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let unchanged = inner.layout == ticket.layout
            && inner.transcript.get(ticket.index) == Some(&ticket.target);
        if !unchanged {
            return Err(DomainError::RerollTargetMoved(ticket.index));
        }
        inner.transcript.apply_reroll(ticket.index, reply, mode)?;
        inner.layout += 1;
        Ok(())
    }
}
