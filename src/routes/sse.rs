use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/roster",
    tag = "sse",
    responses((status = 200, description = "Roster refresh and storage status events", content_type = "text/event-stream", body = String))
)]
/// Stream roster refreshes and storage status changes to open pages.
pub async fn roster_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = sse_service::subscribe_roster(&state);
    info!("new roster SSE connection");
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/roster", get(roster_stream))
}
