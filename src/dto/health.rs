use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" while the store answers, "degraded" otherwise.
    pub status: &'static str,
    /// Participants currently held in the in-memory roster.
    pub roster_size: usize,
    /// Timestamp of the last successful refresh, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<String>,
}

impl HealthResponse {
    pub fn new(degraded: bool, roster_size: usize, refreshed_at: Option<String>) -> Self {
        Self {
            status: if degraded { "degraded" } else { "ok" },
            roster_size,
            refreshed_at,
        }
    }
}
