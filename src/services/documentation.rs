use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI description of the check-in JSON API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::roster_stream,
        crate::routes::participants::list_participants,
        crate::routes::participants::refresh_participants,
        crate::routes::participants::update_status,
        crate::routes::participants::check_in,
        crate::routes::participants::mark_waiting,
        crate::routes::participants::submit_judging,
        crate::routes::participants::checked_in_teams,
        crate::routes::participants::leaderboards,
        crate::routes::participants::import_participants,
        crate::routes::participants::generate_test_data,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::participant::RosterResponse,
            crate::dto::participant::StatusUpdateRequest,
            crate::dto::participant::JudgingRequest,
            crate::dto::participant::ImportRequest,
            crate::dto::participant::GenerateRequest,
            crate::dto::participant::MutationResponse,
            crate::dto::participant::RefreshResponse,
            crate::dto::participant::TeamOption,
            crate::dto::participant::LeaderboardsResponse,
            crate::dto::notice::Notice,
            crate::dto::notice::NoticeLevel,
            crate::dto::sse::RosterRefreshed,
            crate::dto::sse::SystemStatus,
            crate::dao::models::Participant,
            crate::dao::models::Category,
            crate::dao::models::ParticipantStatus,
            crate::dao::models::JudgingCriteria,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "participants", description = "Roster, status changes and judging"),
        (name = "admin", description = "Bulk import and test data"),
    )
)]
pub struct ApiDoc;
