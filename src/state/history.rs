use std::collections::VecDeque;

use crate::state::scoring::ScoreState;

/// Number of snapshots kept when the configuration does not say otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Score snapshot taken right before an action, with a label describing the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreHistoryEntry {
    /// State as it was before the action ran.
    pub state: ScoreState,
    /// Human-readable description, e.g. `Point awarded to side_a`.
    pub description: String,
}

/// Bounded undo stack. Once full, pushing drops the oldest snapshot.
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    entries: VecDeque<ScoreHistoryEntry>,
    limit: usize,
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ScoreHistory {
    /// Create an empty history keeping at most `limit` entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record the state preceding an action.
    pub fn push(&mut self, state: ScoreState, description: impl Into<String>) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(ScoreHistoryEntry {
            state,
            description: description.into(),
        });
    }

    /// Pop the most recent snapshot and return the state to restore.
    ///
    /// `None` means there is nothing to undo; the caller keeps its current state.
    pub fn undo(&mut self) -> Option<ScoreState> {
        self.entries.pop_back().map(|entry| entry.state)
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &ScoreHistoryEntry> {
        self.entries.iter()
    }

    /// Whether there is nothing left to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
