//! Operator actions on the participant collection.
//!
//! Every write goes straight to the store and is followed by a full
//! re-fetch; the roster is never patched locally.

use std::time::SystemTime;

use tracing::{info, warn};
use validator::Validate;

use crate::{
    dao::models::{
        Category, JudgingCriteria, NewParticipant, ParticipantPatch, ParticipantStatus,
    },
    dto::{
        format_system_time,
        participant::{JudgingForm, LeaderboardsResponse, RosterResponse, TeamOption},
    },
    error::ServiceError,
    services::{import, sse_events, test_data},
    state::SharedState,
};

/// Shown when the judging form is submitted without a team.
pub const SELECT_TEAM_MESSAGE: &str = "Please select a team to judge.";
/// Shown when a judging score is out of range or not a whole number.
pub const INVALID_SCORES_MESSAGE: &str =
    "Please enter valid scores between 0 and 10 for all criteria.";

/// Outcome of the re-fetch that follows a successful write.
///
/// The write itself already happened in both cases.
#[derive(Debug)]
pub enum Resync {
    /// The roster now holds this many participants.
    Fresh(usize),
    /// The roster could not be refreshed and still shows the previous data.
    Stale(ServiceError),
}

impl Resync {
    /// Roster size after the refresh, when it succeeded.
    pub fn count(&self) -> Option<usize> {
        match self {
            Resync::Fresh(count) => Some(*count),
            Resync::Stale(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Resync::Fresh(_) => None,
            Resync::Stale(err) => Some(err),
        }
    }
}

/// Records written by a bulk operation and the refresh that followed.
#[derive(Debug)]
pub struct BulkOutcome {
    pub created: usize,
    pub resync: Resync,
}

impl BulkOutcome {
    pub fn into_resync(self) -> Resync {
        self.resync
    }
}

/// Fetch the whole collection, replace the roster with it and announce the
/// new roster to SSE subscribers.
///
/// A missing collection empties the roster. Any other failure leaves the
/// roster as it was.
pub async fn refresh(state: &SharedState) -> Result<usize, ServiceError> {
    let (count, at) = load(state).await?;
    sse_events::broadcast_roster_refreshed(state, count, at);
    Ok(count)
}

/// Same as [`refresh`] but silent, for page loads.
///
/// Open leaderboards reload on `roster.refreshed`; announcing their own
/// reloads would keep them reloading each other.
pub async fn reload(state: &SharedState) -> Result<usize, ServiceError> {
    load(state).await.map(|(count, _)| count)
}

async fn load(state: &SharedState) -> Result<(usize, SystemTime), ServiceError> {
    let store = state.require_store().await?;
    let fetched = store.fetch_all().await.map_err(ServiceError::from);
    let now = SystemTime::now();

    let count = match fetched {
        Ok(participants) => {
            let count = participants.len();
            state.roster().write().await.replace(participants, now);
            count
        }
        Err(ServiceError::NotFound(message)) => {
            info!(%message, "participant collection missing; roster emptied");
            state.roster().write().await.clear(now);
            0
        }
        Err(err) => {
            warn!(error = %err, "failed to fetch participants");
            return Err(err);
        }
    };

    info!(count, "roster refreshed");
    Ok((count, now))
}

/// Mark a participant as present and ready to be judged.
pub async fn check_in(state: &SharedState, id: &str) -> Result<Resync, ServiceError> {
    update_status(state, id, ParticipantStatus::CheckedIn).await
}

/// Put a participant on hold.
pub async fn mark_waiting(state: &SharedState, id: &str) -> Result<Resync, ServiceError> {
    update_status(state, id, ParticipantStatus::Waiting).await
}

/// Write any status; no transition order is enforced.
pub async fn update_status(
    state: &SharedState,
    id: &str,
    status: ParticipantStatus,
) -> Result<Resync, ServiceError> {
    let store = state.require_store().await?;
    store
        .update_one(id.to_string(), ParticipantPatch::status(status))
        .await
        .inspect_err(|err| warn!(participant_id = %id, error = %err, "status update failed"))?;

    info!(participant_id = %id, %status, "participant status updated");
    Ok(resync(state).await)
}

/// Validate the raw judging form and record the result.
pub async fn submit_judging_form(
    state: &SharedState,
    form: JudgingForm,
) -> Result<Resync, ServiceError> {
    let team_id = form.team_id.trim();
    if team_id.is_empty() {
        return Err(ServiceError::InvalidInput(SELECT_TEAM_MESSAGE.into()));
    }
    let criteria = parse_scores(form.scores())?;
    submit_judging(state, team_id, criteria, form.comments).await
}

/// Record five scores and comments for a participant and mark it judged.
///
/// Nothing is written when a score lies outside `0..=10`.
pub async fn submit_judging(
    state: &SharedState,
    id: &str,
    criteria: JudgingCriteria,
    comments: String,
) -> Result<Resync, ServiceError> {
    criteria
        .validate()
        .map_err(|_| ServiceError::InvalidInput(INVALID_SCORES_MESSAGE.into()))?;

    let store = state.require_store().await?;
    store
        .update_one(id.to_string(), ParticipantPatch::judged(&criteria, comments))
        .await
        .inspect_err(|err| warn!(participant_id = %id, error = %err, "judging submission failed"))?;

    info!(participant_id = %id, score = criteria.total(), "judging recorded");
    Ok(resync(state).await)
}

/// Turn the five textual form inputs into criteria. A blank input counts as 0.
pub fn parse_scores(inputs: [&str; 5]) -> Result<JudgingCriteria, ServiceError> {
    let mut scores = [0; 5];
    for (slot, input) in scores.iter_mut().zip(inputs) {
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        *slot = input
            .parse::<i32>()
            .ok()
            .filter(|score| (0..=10).contains(score))
            .ok_or_else(|| ServiceError::InvalidInput(INVALID_SCORES_MESSAGE.into()))?;
    }
    Ok(JudgingCriteria::from_scores(scores))
}

/// Create one participant per CSV data row, then refresh once.
///
/// The whole text is parsed before the first write. Rows are then created one
/// at a time; a failing create stops the import and the rows already written
/// stay.
pub async fn import_csv(state: &SharedState, text: &str) -> Result<BulkOutcome, ServiceError> {
    let rows = import::parse_csv(text).map_err(|err| {
        ServiceError::InvalidInput(format!(
            "Error importing participants. Please check the CSV format ({err})."
        ))
    })?;
    create_all(state, rows, "import").await
}

/// Create `count` random participants (the configured default when `None`),
/// then refresh once.
pub async fn generate_test_data(
    state: &SharedState,
    count: Option<usize>,
) -> Result<BulkOutcome, ServiceError> {
    let count = count.unwrap_or(state.config().test_data_count);
    let records = test_data::generate(count, &mut rand::rng());
    create_all(state, records, "test data").await
}

async fn create_all(
    state: &SharedState,
    records: Vec<NewParticipant>,
    source: &'static str,
) -> Result<BulkOutcome, ServiceError> {
    let store = state.require_store().await?;
    let total = records.len();
    let mut created = 0;

    for record in records {
        if let Err(err) = store.create_one(record).await {
            warn!(
                source,
                created,
                total,
                error = %err,
                "bulk creation aborted; earlier records were kept"
            );
            return Err(err.into());
        }
        created += 1;
    }

    info!(source, created, "participants created");
    Ok(BulkOutcome {
        created,
        resync: resync(state).await,
    })
}

async fn resync(state: &SharedState) -> Resync {
    match refresh(state).await {
        Ok(count) => Resync::Fresh(count),
        Err(err) => Resync::Stale(err),
    }
}

/// Roster filtered by `term`, as served by the JSON API.
pub async fn roster(state: &SharedState, term: &str) -> RosterResponse {
    let roster = state.roster().read().await;
    RosterResponse {
        participants: roster.filter(term).into_iter().cloned().collect(),
        refreshed_at: roster.refreshed_at().map(format_system_time),
        degraded: state.is_degraded(),
    }
}

/// Teams that can be picked on the judging form.
pub async fn checked_in_teams(state: &SharedState) -> Vec<TeamOption> {
    let roster = state.roster().read().await;
    roster.checked_in().into_iter().map(TeamOption::from).collect()
}

/// Junior and senior rankings over judged participants.
pub async fn leaderboards(state: &SharedState) -> LeaderboardsResponse {
    let roster = state.roster().read().await;
    let ranked = |category| {
        roster
            .leaderboard(category)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    };
    LeaderboardsResponse {
        junior: ranked(Category::Junior),
        senior: ranked(Category::Senior),
    }
}
