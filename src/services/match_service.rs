use std::time::SystemTime;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::MatchResultEntity,
    dto::{
        matches::{HistoryResponse, ScoreSnapshot, StartMatchRequest, UndoResponse},
        results::MatchResultSummary,
        sse::MatchAbandonedEvent,
        validation::validate_match_id,
    },
    error::ServiceError,
    services::sse_events::{
        broadcast_match_abandoned, broadcast_match_finalized, broadcast_score_updated,
    },
    state::{Participants, ScoringSession, SharedState, scoring::Side},
};

/// Open a scoring session for a match; side A serves first.
pub fn start_match(
    state: &SharedState,
    request: StartMatchRequest,
) -> Result<ScoreSnapshot, ServiceError> {
    let StartMatchRequest {
        match_id,
        side_a,
        side_b,
    } = request;

    if side_a == side_b {
        return Err(ServiceError::InvalidInput(format!(
            "participant `{side_a}` cannot play on both sides"
        )));
    }

    let session = ScoringSession::new(
        match_id,
        Participants { side_a, side_b },
        state.config().history_limit,
    );
    let snapshot = ScoreSnapshot::from(&session);
    state.open_session(session)?;

    info!(
        session_id = %snapshot.session_id,
        match_id = %snapshot.match_id,
        "scoring session started"
    );
    broadcast_score_updated(state, &snapshot);
    Ok(snapshot)
}

/// Snapshots of every live session, oldest first.
pub fn list_matches(state: &SharedState) -> Vec<ScoreSnapshot> {
    let mut sessions =
        state.map_sessions(|session| (session.started_at, ScoreSnapshot::from(session)));
    sessions.sort_by_key(|(started_at, _)| *started_at);
    sessions.into_iter().map(|(_, snapshot)| snapshot).collect()
}

/// Current score of a session.
pub fn score(state: &SharedState, id: Uuid) -> Result<ScoreSnapshot, ServiceError> {
    state.with_session(id, |session| ScoreSnapshot::from(session))
}

/// Award a point to `side` and publish the new score.
pub fn award_point(
    state: &SharedState,
    id: Uuid,
    side: Side,
) -> Result<ScoreSnapshot, ServiceError> {
    let snapshot = state.with_session_mut(id, |session| {
        session.award_point(side);
        ScoreSnapshot::from(&*session)
    })?;

    debug!(
        session_id = %id,
        %side,
        points_a = snapshot.side_a.points,
        points_b = snapshot.side_b.points,
        games_a = snapshot.side_a.games,
        games_b = snapshot.side_b.games,
        "point awarded"
    );
    broadcast_score_updated(state, &snapshot);
    Ok(snapshot)
}

/// Revert the last point. An empty history is reported through `undone = false`.
pub fn undo(state: &SharedState, id: Uuid) -> Result<UndoResponse, ServiceError> {
    let (undone, score) = state.with_session_mut(id, |session| {
        let undone = session.undo();
        (undone, ScoreSnapshot::from(&*session))
    })?;

    if undone {
        debug!(session_id = %id, "last point undone");
        broadcast_score_updated(state, &score);
    } else {
        debug!(session_id = %id, "nothing to undo");
    }
    Ok(UndoResponse { undone, score })
}

/// Labels of the actions that can still be undone.
pub fn history(state: &SharedState, id: Uuid) -> Result<HistoryResponse, ServiceError> {
    let entries = state.with_session(id, ScoringSession::history)?;
    Ok(HistoryResponse {
        session_id: id,
        entries,
    })
}

/// Close a session and record its result with the result store.
///
/// Refused while sets won are level, since no winner can be named. The
/// session is frozen while the result is written: points, undo, abandon and a
/// second finalize fail with [`ServiceError::InvalidState`]. If recording
/// fails the session is unfrozen so the umpire can retry.
pub async fn finalize(
    state: &SharedState,
    id: Uuid,
) -> Result<MatchResultSummary, ServiceError> {
    let entity = state.begin_finalize(id, build_result)?;
    let pending = PendingFinalize {
        state,
        id,
        recorded: false,
    };

    let store = state.require_result_store().await?;
    store.record_result(entity.clone()).await?;

    pending.complete()?;
    info!(
        session_id = %id,
        match_id = %entity.match_id,
        winner_id = %entity.winner_id,
        score = %entity.score,
        "match result recorded"
    );
    let summary = MatchResultSummary::from(entity);
    broadcast_match_finalized(state, &summary);
    Ok(summary)
}

/// Unfreezes the session on drop unless the result was recorded.
struct PendingFinalize<'a> {
    state: &'a SharedState,
    id: Uuid,
    recorded: bool,
}

impl PendingFinalize<'_> {
    fn complete(mut self) -> Result<ScoringSession, ServiceError> {
        self.recorded = true;
        self.state.complete_finalize(self.id)
    }
}

impl Drop for PendingFinalize<'_> {
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        warn!(session_id = %self.id, "result not recorded; session reopened for scoring");
        self.state.abort_finalize(self.id);
    }
}

/// Drop a session without recording anything.
pub fn abandon(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let session = state.close_session(id)?;
    info!(session_id = %id, match_id = %session.match_id, "scoring session abandoned");
    broadcast_match_abandoned(
        state,
        &MatchAbandonedEvent {
            session_id: id,
            match_id: session.match_id,
        },
    );
    Ok(())
}

/// Every recorded result.
pub async fn list_results(state: &SharedState) -> Result<Vec<MatchResultSummary>, ServiceError> {
    let store = state.require_result_store().await?;
    let results = store.list_results().await?;
    Ok(results.into_iter().map(Into::into).collect())
}

/// Recorded result of `match_id`.
///
/// The id is checked against the same rules as at match start before it
/// reaches a store, where it becomes part of a document key.
pub async fn find_result(
    state: &SharedState,
    match_id: String,
) -> Result<MatchResultSummary, ServiceError> {
    validate_match_id(&match_id).map_err(|err| {
        ServiceError::InvalidInput(format!("invalid match id `{match_id}`: {err}"))
    })?;
    let store = state.require_result_store().await?;
    match store.find_result(match_id.clone()).await? {
        Some(result) => Ok(result.into()),
        None => Err(ServiceError::NotFound(format!(
            "no result recorded for match `{match_id}`"
        ))),
    }
}

fn build_result(session: &ScoringSession) -> Result<MatchResultEntity, ServiceError> {
    let outcome = session.finalize();
    let (Some(winner), Some(winner_id)) = (outcome.winner, session.winner_id(&outcome)) else {
        return Err(ServiceError::InvalidState(format!(
            "sets are level at {}-{}; no winner to record",
            outcome.sets_won_a, outcome.sets_won_b
        )));
    };
    let winner_id = winner_id.to_string();

    Ok(MatchResultEntity {
        match_id: session.match_id.clone(),
        session_id: session.id,
        side_a: session.participants.side_a.clone(),
        side_b: session.participants.side_b.clone(),
        winner,
        winner_id,
        score: outcome.score_summary,
        sets_won_a: outcome.sets_won_a,
        sets_won_b: outcome.sets_won_b,
        completed_sets: session.score().completed_sets.clone(),
        recorded_at: SystemTime::now(),
    })
}
