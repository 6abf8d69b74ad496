use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        matches::{
            AwardPointRequest, HistoryResponse, ScoreSnapshot, StartMatchRequest, UndoResponse,
        },
        results::MatchResultSummary,
    },
    error::AppError,
    services::match_service,
    state::SharedState,
};

/// Routes driving live scoring sessions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches).post(start_match))
        .route("/matches/{id}", get(get_match).delete(abandon_match))
        .route("/matches/{id}/points", post(award_point))
        .route("/matches/{id}/undo", post(undo_point))
        .route("/matches/{id}/history", get(match_history))
        .route("/matches/{id}/finalize", post(finalize_match))
}

/// Open a scoring session for a match.
#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    request_body = StartMatchRequest,
    responses(
        (status = 201, description = "Session started", body = ScoreSnapshot),
        (status = 400, description = "Invalid match or participant id"),
        (status = 409, description = "Match already being scored")
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<StartMatchRequest>>,
) -> Result<(StatusCode, Json<ScoreSnapshot>), AppError> {
    let snapshot = match_service::start_match(&state, payload)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// List live scoring sessions.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses((status = 200, description = "Live sessions", body = [ScoreSnapshot]))
)]
pub async fn list_matches(State(state): State<SharedState>) -> Json<Vec<ScoreSnapshot>> {
    Json(match_service::list_matches(&state))
}

/// Current score of a session.
#[utoipa::path(
    get,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    responses(
        (status = 200, description = "Current score", body = ScoreSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreSnapshot>, AppError> {
    Ok(Json(match_service::score(&state, id)?))
}

/// Discard a session without recording a result.
#[utoipa::path(
    delete,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    responses(
        (status = 204, description = "Session abandoned"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is being finalized")
    )
)]
pub async fn abandon_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match_service::abandon(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Award a point to one side.
#[utoipa::path(
    post,
    path = "/matches/{id}/points",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    request_body = AwardPointRequest,
    responses(
        (status = 200, description = "Updated score", body = ScoreSnapshot),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is being finalized")
    )
)]
pub async fn award_point(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AwardPointRequest>,
) -> Result<Json<ScoreSnapshot>, AppError> {
    Ok(Json(match_service::award_point(&state, id, payload.side)?))
}

/// Revert the last point, if any.
#[utoipa::path(
    post,
    path = "/matches/{id}/undo",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    responses(
        (status = 200, description = "Score after undo; `undone` is false when there was nothing to undo", body = UndoResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is being finalized")
    )
)]
pub async fn undo_point(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UndoResponse>, AppError> {
    Ok(Json(match_service::undo(&state, id)?))
}

/// Actions that can still be undone.
#[utoipa::path(
    get,
    path = "/matches/{id}/history",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    responses(
        (status = 200, description = "Undo history, oldest first", body = HistoryResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn match_history(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    Ok(Json(match_service::history(&state, id)?))
}

/// Close the session and record the result.
#[utoipa::path(
    post,
    path = "/matches/{id}/finalize",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Scoring session identifier")),
    responses(
        (status = 200, description = "Result recorded", body = MatchResultSummary),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Sets are level, or already being finalized"),
        (status = 503, description = "No result store available")
    )
)]
pub async fn finalize_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchResultSummary>, AppError> {
    Ok(Json(match_service::finalize(&state, id).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig, dao::result_store::memory::InMemoryResultStore, routes,
        state::AppState,
    };

    async fn app() -> Router<()> {
        let state = AppState::new(AppConfig::default());
        state
            .set_result_store(Arc::new(InMemoryResultStore::new()))
            .await;
        routes::router(state)
    }

    async fn call(
        app: &Router<()>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn full_match_over_http() {
        let app = app().await;
        let (status, started) = call(
            &app,
            "POST",
            "/matches",
            Some(json!({"match_id": "t1-m1", "side_a": "alice", "side_b": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = started["session_id"].as_str().unwrap().to_string();

        for _ in 0..48 {
            let (status, _) = call(
                &app,
                "POST",
                &format!("/matches/{id}/points"),
                Some(json!({"side": "side_a"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, result) = call(&app, "POST", &format!("/matches/{id}/finalize"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["winner_id"], "alice");
        assert_eq!(result["score"], "6-0,6-0");

        let (status, _) = call(&app, "GET", &format!("/matches/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, stored) = call(&app, "GET", "/results/t1-m1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["sets_won_a"], 2);
    }

    #[tokio::test]
    async fn malformed_result_id_is_a_bad_request() {
        let app = app().await;
        let (status, _) = call(&app, "GET", "/results/m-1%3Frev%3D1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, "GET", "/results/m-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_start_payload_is_rejected() {
        let app = app().await;
        let (status, _) = call(
            &app,
            "POST",
            "/matches",
            Some(json!({"match_id": "bad id", "side_a": "alice", "side_b": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn undo_without_points_reports_nothing_to_undo() {
        let app = app().await;
        let (_, started) = call(
            &app,
            "POST",
            "/matches",
            Some(json!({"match_id": "t1-m2", "side_a": "alice", "side_b": "bob"})),
        )
        .await;
        let id = started["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "POST", &format!("/matches/{id}/undo"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["undone"], false);

        let (status, _) = call(
            &app,
            "POST",
            "/matches",
            Some(json!({"match_id": "t1-m2", "side_a": "carol", "side_b": "dave"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
