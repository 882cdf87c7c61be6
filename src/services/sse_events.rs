use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{RosterRefreshed, ServerEvent, SystemStatus},
    state::SharedState,
};

/// Event name announcing a freshly fetched roster.
pub const EVENT_ROSTER_REFRESHED: &str = "roster.refreshed";
/// Event name announcing a change of the degraded flag.
pub const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Tell every open page that the roster was replaced.
pub fn broadcast_roster_refreshed(state: &SharedState, count: usize, at: SystemTime) {
    send_event(state, EVENT_ROSTER_REFRESHED, &RosterRefreshed::new(count, at));
}

/// Tell every open page whether the store is reachable.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
