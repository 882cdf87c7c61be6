//! Request and response payloads for the participant JSON API and HTML forms.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as, skip_serializing_none};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dao::models::{JudgingCriteria, Participant, ParticipantStatus};

/// Optional case-insensitive filter applied to the roster.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring matched against team number, team name and first name.
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchQuery {
    /// Search term, empty when none was given.
    pub fn term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Roster snapshot served by `GET /api/participants`.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    pub participants: Vec<Participant>,
    /// RFC 3339 timestamp of the last successful refresh.
    pub refreshed_at: Option<String>,
    /// Set while no store is reachable and the roster may be stale.
    pub degraded: bool,
}

/// Generic status update; any status is accepted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: ParticipantStatus,
}

/// Judging result submitted through the JSON API.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JudgingRequest {
    #[validate(nested)]
    pub criteria: JudgingCriteria,
    #[serde(default)]
    pub comments: String,
}

/// Raw judging form as posted by the HTML page.
///
/// Scores stay textual here; the service decides what counts as a valid
/// score so that the form and the API report the same message.
#[derive(Debug, Default, Deserialize)]
pub struct JudgingForm {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub criteria1: String,
    #[serde(default)]
    pub criteria2: String,
    #[serde(default)]
    pub criteria3: String,
    #[serde(default)]
    pub criteria4: String,
    #[serde(default)]
    pub criteria5: String,
    #[serde(default)]
    pub comments: String,
}

impl JudgingForm {
    /// Criteria inputs in form order.
    pub fn scores(&self) -> [&str; 5] {
        [
            &self.criteria1,
            &self.criteria2,
            &self.criteria3,
            &self.criteria4,
            &self.criteria5,
        ]
    }
}

/// CSV text to import, header line included.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRequest {
    #[serde(default)]
    pub csv: String,
}

/// Test-data generation parameters.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct GenerateRequest {
    /// Number of participants to create; the configured default when omitted.
    #[validate(range(min = 1, max = 1000))]
    #[serde(default)]
    pub count: Option<usize>,
}

/// Test-data form of the admin page; an empty count field means the default.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateForm {
    #[validate(range(min = 1, max = 1000))]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub count: Option<usize>,
}

/// Outcome of a write followed by a roster refresh.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct MutationResponse {
    /// Confirmation shown to the operator, if the operation has one.
    pub message: Option<String>,
    /// Records created by bulk operations.
    pub created: Option<usize>,
    /// Roster size after the refresh.
    pub roster_size: Option<usize>,
    /// Set when the write succeeded but the refresh did not.
    pub resync_error: Option<String>,
}

/// Roster size after an explicit refresh.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub count: usize,
}

/// Entry of the judging team selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamOption {
    pub id: String,
    pub label: String,
}

impl From<&Participant> for TeamOption {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            label: format!("{} - {}", participant.team_number, participant.team_name),
        }
    }
}

/// Judged participants ranked per category.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardsResponse {
    pub junior: Vec<Participant>,
    pub senior: Vec<Participant>,
}
