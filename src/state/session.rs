use std::time::SystemTime;

use uuid::Uuid;

use crate::state::{
    history::ScoreHistory,
    scoring::{MatchOutcome, ScoreState, Side},
};

/// Participant identifiers mapped onto the two sides of the net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participants {
    /// Player occupying [`Side::SideA`].
    pub side_a: String,
    /// Player occupying [`Side::SideB`].
    pub side_b: String,
}

impl Participants {
    /// Identifier of the player on `side`.
    pub fn on(&self, side: Side) -> &str {
        match side {
            Side::SideA => &self.side_a,
            Side::SideB => &self.side_b,
        }
    }
}

/// Live scoring of one match by one umpire.
///
/// The session is the only writer of its [`ScoreState`]; every point goes
/// through [`ScoringSession::award_point`] which snapshots the previous state
/// first so it can be undone.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    /// Identifier of the session.
    pub id: Uuid,
    /// External reference of the match being scored (e.g. tournament match id).
    pub match_id: String,
    /// Players on each side.
    pub participants: Participants,
    /// When scoring started.
    pub started_at: SystemTime,
    score: ScoreState,
    history: ScoreHistory,
    finalizing: bool,
}

impl ScoringSession {
    /// Start scoring `match_id` from a fresh score.
    pub fn new(match_id: String, participants: Participants, history_limit: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            participants,
            started_at: SystemTime::now(),
            score: ScoreState::new(),
            history: ScoreHistory::with_limit(history_limit),
            finalizing: false,
        }
    }

    /// Current score.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Whether the result of this session is being recorded.
    ///
    /// A finalizing session is frozen: the registry refuses to mutate or
    /// close it until recording succeeds or is rolled back.
    pub fn is_finalizing(&self) -> bool {
        self.finalizing
    }

    pub(super) fn set_finalizing(&mut self, finalizing: bool) {
        self.finalizing = finalizing;
    }

    /// Award a point to `side`, remembering the previous score for undo.
    pub fn award_point(&mut self, side: Side) -> &ScoreState {
        let next = self.score.award_point(side);
        let previous = std::mem::replace(&mut self.score, next);
        self.history
            .push(previous, format!("Point awarded to {side}"));
        &self.score
    }

    /// Restore the score preceding the last recorded action.
    ///
    /// Returns `false` when there is nothing to undo, leaving the score untouched.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.score = previous;
                true
            }
            None => false,
        }
    }

    /// Whether [`ScoringSession::undo`] would change anything.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Descriptions of the undoable actions, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .entries()
            .map(|entry| entry.description.clone())
            .collect()
    }

    /// Outcome of the match as scored so far.
    pub fn finalize(&self) -> MatchOutcome {
        self.score.finalize()
    }

    /// Participant identifier of the winning side, if there is one.
    pub fn winner_id(&self, outcome: &MatchOutcome) -> Option<&str> {
        outcome.winner.map(|side| self.participants.on(side))
    }
}
