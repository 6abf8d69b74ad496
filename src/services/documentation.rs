use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the umpire backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::matches::start_match,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match,
        crate::routes::matches::abandon_match,
        crate::routes::matches::award_point,
        crate::routes::matches::undo_point,
        crate::routes::matches::match_history,
        crate::routes::matches::finalize_match,
        crate::routes::results::list_results,
        crate::routes::results::get_result,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::matches::StartMatchRequest,
            crate::dto::matches::AwardPointRequest,
            crate::dto::matches::SideScore,
            crate::dto::matches::ScoreSnapshot,
            crate::dto::matches::UndoResponse,
            crate::dto::matches::HistoryResponse,
            crate::dto::results::MatchResultSummary,
            crate::dto::sse::MatchAbandonedEvent,
            crate::state::scoring::Side,
            crate::state::scoring::Tally,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "matches", description = "Live match scoring"),
        (name = "results", description = "Recorded match results"),
    )
)]
pub struct ApiDoc;
