use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// Health check.
pub mod health;
/// Live scoring.
pub mod matches;
/// Recorded results.
pub mod results;
/// Spectator event stream.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(matches::router())
        .merge(results::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
