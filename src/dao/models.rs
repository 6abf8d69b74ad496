use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::scoring::{Side, Tally};

/// Final result of a scored match, as handed to the result store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResultEntity {
    /// External reference of the match (tournament match id, challenge id...).
    pub match_id: String,
    /// Scoring session that produced the result.
    pub session_id: Uuid,
    /// Player on side A.
    pub side_a: String,
    /// Player on side B.
    pub side_b: String,
    /// Side that won the match.
    pub winner: Side,
    /// Identifier of the winning player.
    pub winner_id: String,
    /// Human-readable per-set score, side A first (e.g. `6-4,7-5`).
    pub score: String,
    /// Sets won by side A.
    pub sets_won_a: u32,
    /// Sets won by side B.
    pub sets_won_b: u32,
    /// Game counts of every completed set.
    pub completed_sets: Vec<Tally>,
    /// When the result was recorded.
    pub recorded_at: SystemTime,
}
