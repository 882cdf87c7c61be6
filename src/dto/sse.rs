use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use super::format_system_time;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every successful roster refresh.
pub struct RosterRefreshed {
    /// Number of participants now held in the roster.
    pub count: usize,
    /// RFC 3339 timestamp of the refresh.
    pub refreshed_at: String,
}

impl RosterRefreshed {
    pub fn new(count: usize, refreshed_at: SystemTime) -> Self {
        Self {
            count,
            refreshed_at: format_system_time(refreshed_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}
