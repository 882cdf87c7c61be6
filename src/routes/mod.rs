use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod pages;
pub mod participants;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let base = state.config().base_path.clone();
    let app_router = health::router()
        .merge(sse::router())
        .merge(participants::router())
        .merge(pages::router(&base));

    let docs_router = docs::router(state.clone());

    app_router.merge(docs_router).with_state(state)
}
