use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        notice::Operation,
        participant::{
            GenerateRequest, ImportRequest, JudgingRequest, LeaderboardsResponse,
            MutationResponse, RefreshResponse, RosterResponse, SearchQuery, StatusUpdateRequest,
            TeamOption,
        },
    },
    error::AppError,
    services::participant_service::{self, BulkOutcome, Resync},
    state::SharedState,
};

/// JSON API mirroring the operator actions of the HTML pages.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/participants", get(list_participants))
        .route("/api/participants/refresh", post(refresh_participants))
        .route("/api/participants/{id}/status", put(update_status))
        .route("/api/participants/{id}/check-in", post(check_in))
        .route("/api/participants/{id}/waiting", post(mark_waiting))
        .route("/api/participants/{id}/judging", post(submit_judging))
        .route("/api/teams/checked-in", get(checked_in_teams))
        .route("/api/leaderboards", get(leaderboards))
        .route("/api/import", post(import_participants))
        .route("/api/test-data", post(generate_test_data))
}

/// List the roster, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/participants",
    tag = "participants",
    params(SearchQuery),
    responses((status = 200, description = "Current roster", body = RosterResponse))
)]
pub async fn list_participants(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Json<RosterResponse> {
    Json(participant_service::roster(&state, query.term()).await)
}

/// Re-fetch the whole collection into the roster.
#[utoipa::path(
    post,
    path = "/api/participants/refresh",
    tag = "participants",
    responses(
        (status = 200, description = "Roster refreshed", body = RefreshResponse),
        (status = 503, description = "Storage offline"),
        (status = 403, description = "Storage refused access")
    )
)]
pub async fn refresh_participants(
    State(state): State<SharedState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let count = participant_service::refresh(&state).await?;
    Ok(Json(RefreshResponse { count }))
}

/// Set any status on a participant.
#[utoipa::path(
    put,
    path = "/api/participants/{id}/status",
    tag = "participants",
    params(("id" = String, Path, description = "Participant identifier")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status written", body = MutationResponse),
        (status = 404, description = "Unknown participant")
    )
)]
pub async fn update_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let resync = participant_service::update_status(&state, &id, payload.status).await?;
    Ok(Json(mutation_response(Operation::UpdateStatus, None, &resync)))
}

/// Mark a participant as checked in.
#[utoipa::path(
    post,
    path = "/api/participants/{id}/check-in",
    tag = "participants",
    params(("id" = String, Path, description = "Participant identifier")),
    responses((status = 200, description = "Participant checked in", body = MutationResponse))
)]
pub async fn check_in(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let resync = participant_service::check_in(&state, &id).await?;
    Ok(Json(mutation_response(Operation::UpdateStatus, None, &resync)))
}

/// Put a participant on hold.
#[utoipa::path(
    post,
    path = "/api/participants/{id}/waiting",
    tag = "participants",
    params(("id" = String, Path, description = "Participant identifier")),
    responses((status = 200, description = "Participant waiting", body = MutationResponse))
)]
pub async fn mark_waiting(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let resync = participant_service::mark_waiting(&state, &id).await?;
    Ok(Json(mutation_response(Operation::UpdateStatus, None, &resync)))
}

/// Record the five judging scores of a participant.
#[utoipa::path(
    post,
    path = "/api/participants/{id}/judging",
    tag = "participants",
    params(("id" = String, Path, description = "Participant identifier")),
    request_body = JudgingRequest,
    responses(
        (status = 200, description = "Judging recorded", body = MutationResponse),
        (status = 400, description = "Score outside 0..=10")
    )
)]
pub async fn submit_judging(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<JudgingRequest>>,
) -> Result<Json<MutationResponse>, AppError> {
    let resync =
        participant_service::submit_judging(&state, &id, payload.criteria, payload.comments)
            .await?;
    Ok(Json(mutation_response(Operation::SubmitJudging, None, &resync)))
}

/// Teams available on the judging form.
#[utoipa::path(
    get,
    path = "/api/teams/checked-in",
    tag = "participants",
    responses((status = 200, description = "Checked-in teams", body = [TeamOption]))
)]
pub async fn checked_in_teams(State(state): State<SharedState>) -> Json<Vec<TeamOption>> {
    Json(participant_service::checked_in_teams(&state).await)
}

/// Junior and senior rankings.
#[utoipa::path(
    get,
    path = "/api/leaderboards",
    tag = "participants",
    responses((status = 200, description = "Leaderboards", body = LeaderboardsResponse))
)]
pub async fn leaderboards(State(state): State<SharedState>) -> Json<LeaderboardsResponse> {
    Json(participant_service::leaderboards(&state).await)
}

/// Import participants from CSV text.
#[utoipa::path(
    post,
    path = "/api/import",
    tag = "admin",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Participants imported", body = MutationResponse),
        (status = 400, description = "Malformed CSV; nothing was written")
    )
)]
pub async fn import_participants(
    State(state): State<SharedState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let outcome = participant_service::import_csv(&state, &payload.csv).await?;
    Ok(Json(bulk_response(Operation::Import, outcome)))
}

/// Generate random registered participants.
#[utoipa::path(
    post,
    path = "/api/test-data",
    tag = "admin",
    request_body = GenerateRequest,
    responses((status = 200, description = "Test data generated", body = MutationResponse))
)]
pub async fn generate_test_data(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<GenerateRequest>>,
) -> Result<Json<MutationResponse>, AppError> {
    let outcome = participant_service::generate_test_data(&state, payload.count).await?;
    Ok(Json(bulk_response(Operation::GenerateTestData, outcome)))
}

fn mutation_response(
    operation: Operation,
    created: Option<usize>,
    resync: &Resync,
) -> MutationResponse {
    MutationResponse {
        message: operation.success_notice().map(|notice| notice.message),
        created,
        roster_size: resync.count(),
        resync_error: resync
            .error()
            .map(|err| Operation::LoadParticipants.failure_notice(err).message),
    }
}

fn bulk_response(operation: Operation, outcome: BulkOutcome) -> MutationResponse {
    mutation_response(operation, Some(outcome.created), &outcome.resync)
}
