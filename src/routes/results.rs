use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::results::MatchResultSummary, error::AppError, services::match_service,
    state::SharedState,
};

/// Read-only access to recorded match results.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/results", get(list_results))
        .route("/results/{match_id}", get(get_result))
}

/// List every recorded result.
#[utoipa::path(
    get,
    path = "/results",
    tag = "results",
    responses(
        (status = 200, description = "Recorded results", body = [MatchResultSummary]),
        (status = 503, description = "No result store available")
    )
)]
pub async fn list_results(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchResultSummary>>, AppError> {
    Ok(Json(match_service::list_results(&state).await?))
}

/// Fetch the result recorded for a match.
#[utoipa::path(
    get,
    path = "/results/{match_id}",
    tag = "results",
    params(("match_id" = String, Path, description = "External match reference")),
    responses(
        (status = 200, description = "Recorded result", body = MatchResultSummary),
        (status = 400, description = "Malformed match id"),
        (status = 404, description = "No result recorded for this match")
    )
)]
pub async fn get_result(
    State(state): State<SharedState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchResultSummary>, AppError> {
    Ok(Json(match_service::find_result(&state, match_id).await?))
}
