use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        matches::ScoreSnapshot, results::MatchResultSummary, sse::MatchAbandonedEvent,
        sse::ServerEvent,
    },
    state::SharedState,
};

const EVENT_SCORE_UPDATED: &str = "score.updated";
const EVENT_MATCH_FINALIZED: &str = "match.finalized";
const EVENT_MATCH_ABANDONED: &str = "match.abandoned";

/// Broadcast the latest score of a session.
pub fn broadcast_score_updated(state: &SharedState, snapshot: &ScoreSnapshot) {
    send_public_event(state, EVENT_SCORE_UPDATED, snapshot);
}

/// Broadcast the result recorded for a finished match.
pub fn broadcast_match_finalized(state: &SharedState, result: &MatchResultSummary) {
    send_public_event(state, EVENT_MATCH_FINALIZED, result);
}

/// Broadcast that a session was dropped without a result.
pub fn broadcast_match_abandoned(state: &SharedState, payload: &MatchAbandonedEvent) {
    send_public_event(state, EVENT_MATCH_ABANDONED, payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
