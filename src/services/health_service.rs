use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report degraded mode and the live session count, logging store connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_result_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "result store health check failed");
            }
        }
        Err(_) => warn!("result store unavailable (degraded mode)"),
    }

    let active_sessions = state.session_count();
    HealthResponse::new(state.is_degraded(), active_sessions)
}
