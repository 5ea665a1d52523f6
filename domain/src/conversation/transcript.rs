//! Transcript: the ordered sequence of turns held by a conversation view.
//!
//! Turns are only ever appended, edited in place, removed, or (on reroll)
//! inserted/replaced next to an existing assistant turn. Nothing reorders them.

use super::reroll::RerollMode;
use super::turn::{Role, Turn};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Replace the content of the turn at `index`, keeping its role.
    pub fn edit(&mut self, index: usize, content: impl Into<String>) -> Result<(), DomainError> {
        let len = self.turns.len();
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfRange { index, len })?;
        turn.content = content.into();
        Ok(())
    }

    /// Remove the turn at `index`; the remaining turns keep their relative order.
    pub fn remove(&mut self, index: usize) -> Result<Turn, DomainError> {
        if index >= self.turns.len() {
            return Err(DomainError::IndexOutOfRange {
                index,
                len: self.turns.len(),
            });
        }
        Ok(self.turns.remove(index))
    }

    /// Index of the nearest user turn strictly before `index`.
    pub fn preceding_user_turn(&self, index: usize) -> Option<usize> {
        let end = index.min(self.turns.len());
        self.turns[..end].iter().rposition(Turn::is_user)
    }

    /// The prompt a reroll of `index` resupplies to the reply generator:
    /// every turn up to and including the nearest preceding user turn.
    pub fn reroll_prompt(&self, index: usize) -> Result<&[Turn], DomainError> {
        let turn = self.turns.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: self.turns.len(),
        })?;
        if turn.role != Role::Assistant {
            return Err(DomainError::NotAssistantTurn(index));
        }
        let user_index = self
            .preceding_user_turn(index)
            .ok_or(DomainError::NoPrecedingUserTurn(index))?;
        Ok(&self.turns[..=user_index])
    }

    /// Place a regenerated assistant reply for the turn at `index`.
    ///
    /// `index` must still hold an assistant turn.
    pub fn apply_reroll(
        &mut self,
        index: usize,
        reply: impl Into<String>,
        mode: RerollMode,
    ) -> Result<(), DomainError> {
        match self.turns.get(index) {
            None => {
                return Err(DomainError::IndexOutOfRange {
                    index,
                    len: self.turns.len(),
                });
            }
            Some(turn) if !turn.is_assistant() => {
                return Err(DomainError::NotAssistantTurn(index));
            }
            Some(_) => {}
        }

        let reply = Turn::assistant(reply);
        match mode {
            RerollMode::Insert => self.turns.insert(index + 1, reply),
            RerollMode::Replace => self.turns[index] = reply,
        }
        Ok(())
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self::from_turns(turns)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
