//! Conversation store.
//!
//! An ordered, append-only sequence of [`Turn`]s. Insertion order is both
//! display order and request order. The only way to remove a turn is to
//! clear the whole conversation.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::llm::Turn;

/// Thread-safe holder for the current conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: RwLock<Vec<Turn>>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the conversation.
    pub fn append(&self, turn: Turn) {
        let mut turns = self.turns.write().unwrap_or_else(PoisonError::into_inner);
        turns.push(turn);
        debug!(turns = turns.len(), "turn appended");
    }

    /// Drop every turn.
    pub fn clear(&self) {
        let mut turns = self.turns.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = turns.len();
        turns.clear();
        debug!(dropped, "conversation cleared");
    }

    /// A copy of the conversation as it is right now.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
