use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Swagger UI at `/docs`, serving the JSON API description.
pub fn router(state: SharedState) -> Router<SharedState> {
    let swagger: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    swagger.with_state(state)
}
