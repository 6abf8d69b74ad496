use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::MatchResultEntity,
    dto::format_system_time,
    state::scoring::{Side, Tally},
};

/// Recorded result of a finished match.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MatchResultSummary {
    /// External match reference.
    pub match_id: String,
    /// Session that scored the match.
    pub session_id: Uuid,
    /// Participant on side A.
    pub side_a: String,
    /// Participant on side B.
    pub side_b: String,
    /// Winning side.
    pub winner: Side,
    /// Participant identifier of the winner.
    pub winner_id: String,
    /// Per-set game counts, side A first (e.g. `6-4,7-5`).
    pub score: String,
    /// Sets won by side A.
    pub sets_won_a: u32,
    /// Sets won by side B.
    pub sets_won_b: u32,
    /// Game counts of every set.
    pub completed_sets: Vec<Tally>,
    /// RFC 3339 timestamp of the recording.
    pub recorded_at: String,
}

impl From<MatchResultEntity> for MatchResultSummary {
    fn from(entity: MatchResultEntity) -> Self {
        Self {
            match_id: entity.match_id,
            session_id: entity.session_id,
            side_a: entity.side_a,
            side_b: entity.side_b,
            winner: entity.winner,
            winner_id: entity.winner_id,
            score: entity.score,
            sets_won_a: entity.sets_won_a,
            sets_won_b: entity.sets_won_b,
            completed_sets: entity.completed_sets,
            recorded_at: format_system_time(entity.recorded_at),
        }
    }
}
