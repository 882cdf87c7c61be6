use tracing::warn;

use crate::{
    dto::{format_system_time, health::HealthResponse},
    state::SharedState,
};

/// Report degraded mode and roster freshness while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    let roster = state.roster().read().await;
    HealthResponse::new(
        state.is_degraded(),
        roster.len(),
        roster.refreshed_at().map(format_system_time),
    )
}
