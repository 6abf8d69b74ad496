use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        format_system_time,
        validation::{validate_match_id, validate_participant_id},
    },
    state::{
        ScoringSession,
        scoring::{Side, Tally},
    },
};

/// Payload opening a scoring session for a match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartMatchRequest {
    /// External reference of the match (tournament match id, challenge id...).
    #[validate(custom(function = "validate_match_id"))]
    pub match_id: String,
    /// Participant on side A. Serves first.
    #[validate(custom(function = "validate_participant_id"))]
    pub side_a: String,
    /// Participant on side B.
    #[validate(custom(function = "validate_participant_id"))]
    pub side_b: String,
}

/// Payload awarding one point.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AwardPointRequest {
    /// Side that won the point.
    pub side: Side,
}

/// Score of one side as shown on the umpire board.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SideScore {
    /// Participant identifier.
    pub participant_id: String,
    /// Raw points in the current game.
    pub points: u32,
    /// Tennis label for the points (`0`, `15`, `30`, `40`, `AD`).
    pub point_label: String,
    /// Games in the current set.
    pub games: u32,
}

/// Full snapshot of a live scoring session.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct ScoreSnapshot {
    /// Scoring session identifier.
    pub session_id: Uuid,
    /// External match reference.
    pub match_id: String,
    /// Score of side A.
    pub side_a: SideScore,
    /// Score of side B.
    pub side_b: SideScore,
    /// Game counts of finished sets, side A first.
    pub completed_sets: Vec<Tally>,
    /// 1-based index of the set in progress.
    pub current_set: u32,
    /// Both sides on 40 or more and within one point.
    pub is_deuce: bool,
    /// Side holding advantage, omitted outside deuce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advantage: Option<Side>,
    /// Side currently serving.
    pub serving: Side,
    /// Whether an undo would change the score.
    pub can_undo: bool,
    /// RFC 3339 timestamp of the first point.
    pub started_at: String,
}

impl From<&ScoringSession> for ScoreSnapshot {
    fn from(session: &ScoringSession) -> Self {
        let score = session.score();
        let side_score = |side: Side| SideScore {
            participant_id: session.participants.on(side).to_string(),
            points: score.points.get(side),
            point_label: score.label(side).to_string(),
            games: score.games.get(side),
        };

        Self {
            session_id: session.id,
            match_id: session.match_id.clone(),
            side_a: side_score(Side::SideA),
            side_b: side_score(Side::SideB),
            completed_sets: score.completed_sets.clone(),
            current_set: score.current_set,
            is_deuce: score.is_deuce,
            advantage: score.advantage,
            serving: score.serving,
            can_undo: session.can_undo(),
            started_at: format_system_time(session.started_at),
        }
    }
}

/// Outcome of an undo request.
#[derive(Debug, Serialize, ToSchema)]
pub struct UndoResponse {
    /// `false` when there was nothing to undo; the score is then unchanged.
    pub undone: bool,
    /// Score after the request.
    pub score: ScoreSnapshot,
}

/// Undoable actions of a session, oldest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Scoring session identifier.
    pub session_id: Uuid,
    /// Action labels, e.g. `Point awarded to side_a`.
    pub entries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Participants;

    #[test]
    fn snapshot_exposes_labels_and_advantage() {
        let mut session = ScoringSession::new(
            "m-1".into(),
            Participants {
                side_a: "alice".into(),
                side_b: "bob".into(),
            },
            50,
        );
        for side in [Side::SideA, Side::SideA, Side::SideA, Side::SideB, Side::SideB, Side::SideB]
        {
            session.award_point(side);
        }
        session.award_point(Side::SideB);

        let snapshot = ScoreSnapshot::from(&session);
        assert_eq!(snapshot.side_a.point_label, "40");
        assert_eq!(snapshot.side_b.point_label, "AD");
        assert_eq!(snapshot.side_b.points, 4);
        assert_eq!(snapshot.advantage, Some(Side::SideB));
        assert!(snapshot.can_undo);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["advantage"], "side_b");
        assert_eq!(json["serving"], "side_a");
    }

    #[test]
    fn start_request_is_validated() {
        let request = StartMatchRequest {
            match_id: "bad id".into(),
            side_a: "alice".into(),
            side_b: "".into(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("match_id"));
        assert!(fields.contains_key("side_b"));
        assert!(!fields.contains_key("side_a"));
    }
}
