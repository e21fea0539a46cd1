//! Short-term conversation memory

use super::turn::{Role, Turn};

/// Append-only, ordered log of the turns of the active negotiation.
///
/// Insertion order is conversational order. There is a single logical writer
/// per negotiation, so no interior locking is done here.
#[derive(Debug, Clone, Default)]
pub struct ShortMemory {
    turns: Vec<Turn>,
}

impl ShortMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn stamped with the current time.
    pub fn add(&mut self, role: Role, content: impl Into<String>) -> &Turn {
        self.turns.push(Turn::new(role, content));
        // Just pushed, so the log is non-empty.
        &self.turns[self.turns.len() - 1]
    }

    /// Owned copy of the history; mutating it never touches the memory.
    pub fn history(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Borrowed view of the history.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Replace the whole history, e.g. when resuming a persisted session.
    pub fn load_history(&mut self, history: Vec<Turn>) {
        self.turns = history;
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
