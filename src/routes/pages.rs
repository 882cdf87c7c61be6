//! Server-rendered pages under the configured base path.
//!
//! Form posts answer with the re-rendered page and a notice describing the
//! outcome.

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, Redirect},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        notice::{Notice, Operation},
        participant::{GenerateForm, ImportRequest, JudgingForm, SearchQuery},
    },
    error::ServiceError,
    navigation::{self, Page},
    services::participant_service::{self, BulkOutcome, Resync},
    state::SharedState,
    views::{self, PageView},
};

/// HTML routes, all mounted below `base`.
pub fn router(base: &str) -> Router<SharedState> {
    let mut router = Router::new()
        .route("/", get(home))
        .route(&format!("{base}/{{*path}}"), get(show_page))
        .route(&format!("{base}/fragments/roster"), get(roster_fragment))
        .route(
            &format!("{base}/participants/{{id}}/check-in"),
            post(check_in),
        )
        .route(
            &format!("{base}/participants/{{id}}/waiting"),
            post(mark_waiting),
        )
        .route(
            &format!("{base}/judging"),
            get(show_page).post(submit_judging),
        )
        .route(&format!("{base}/admin/import"), post(import))
        .route(&format!("{base}/admin/test-data"), post(generate_test_data));

    if !base.is_empty() {
        router = router.route(base, get(show_page));
    }
    router
}

/// Send visitors of the site root to the default page.
async fn home(State(state): State<SharedState>) -> Redirect {
    Redirect::to(&Page::default().url(&state.config().base_path))
}

/// Render the page addressed by the URL, reloading the roster first.
///
/// Any path below the base lands here; unknown ones get the default page.
async fn show_page(
    State(state): State<SharedState>,
    uri: Uri,
    Query(query): Query<SearchQuery>,
) -> Html<String> {
    let page = navigation::resolve(&state.config().base_path, uri.path());
    let notices = match participant_service::reload(&state).await {
        Ok(_) => Vec::new(),
        Err(err) => vec![Operation::LoadParticipants.failure_notice(&err)],
    };
    render(&state, page, &notices, query.term()).await
}

/// Roster table rows only, requested by the search box on every keystroke.
async fn roster_fragment(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Html<String> {
    let roster = state.roster().read().await;
    Html(views::roster::rows(
        &state.config().base_path,
        &roster.filter(query.term()),
    ))
}

async fn check_in(State(state): State<SharedState>, Path(id): Path<String>) -> Html<String> {
    let result = participant_service::check_in(&state, &id).await;
    let notices = notices_for(Operation::UpdateStatus, result);
    render(&state, Page::Checkin, &notices, "").await
}

async fn mark_waiting(State(state): State<SharedState>, Path(id): Path<String>) -> Html<String> {
    let result = participant_service::mark_waiting(&state, &id).await;
    let notices = notices_for(Operation::UpdateStatus, result);
    render(&state, Page::Checkin, &notices, "").await
}

async fn submit_judging(
    State(state): State<SharedState>,
    Form(form): Form<JudgingForm>,
) -> Html<String> {
    let result = participant_service::submit_judging_form(&state, form).await;
    let notices = notices_for(Operation::SubmitJudging, result);
    render(&state, Page::Judging, &notices, "").await
}

async fn import(State(state): State<SharedState>, Form(form): Form<ImportRequest>) -> Html<String> {
    if form.csv.trim().is_empty() {
        return render(&state, Page::Admin, &[], "").await;
    }
    let result = participant_service::import_csv(&state, &form.csv).await;
    let notices = notices_for(Operation::Import, result.map(BulkOutcome::into_resync));
    render(&state, Page::Admin, &notices, "").await
}

async fn generate_test_data(
    State(state): State<SharedState>,
    Valid(Form(form)): Valid<Form<GenerateForm>>,
) -> Html<String> {
    let result = participant_service::generate_test_data(&state, form.count).await;
    let notices = notices_for(
        Operation::GenerateTestData,
        result.map(BulkOutcome::into_resync),
    );
    render(&state, Page::Admin, &notices, "").await
}

/// Success or failure notice for `operation`, plus a load notice when the
/// write went through but the roster could not be refreshed.
fn notices_for(operation: Operation, result: Result<Resync, ServiceError>) -> Vec<Notice> {
    match result {
        Ok(resync) => {
            let mut notices: Vec<Notice> = operation.success_notice().into_iter().collect();
            if let Some(err) = resync.error() {
                notices.push(Operation::LoadParticipants.failure_notice(err));
            }
            notices
        }
        Err(err) => vec![operation.failure_notice(&err)],
    }
}

async fn render(state: &SharedState, page: Page, notices: &[Notice], search: &str) -> Html<String> {
    let config = state.config();
    let roster = state.roster().read().await;
    Html(views::render_page(&PageView {
        base: &config.base_path,
        page,
        roster: &roster,
        notices,
        degraded: state.is_degraded(),
        search,
        test_data_count: config.test_data_count,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::participant_store::{memory::MemoryParticipantStore, testing::FlakyStore},
        state::AppState,
    };

    const CSV: &str = "teamNumber,teamName,firstName,lastName,grade,schoolName,category,arrivalTime\n0001,Team A,John,Doe,6,School X,Junior,08:15";

    fn app_with(store: FlakyStore) -> (Router, SharedState) {
        let state = AppState::with_store(Arc::new(store), AppConfig::default());
        (router("/PEO").with_state(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let body = fields
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencode(value)))
            .collect::<Vec<_>>()
            .join("&");
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn urlencode(value: &str) -> String {
        value
            .bytes()
            .map(|byte| match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                    (byte as char).to_string()
                }
                _ => format!("%{byte:02X}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn root_redirects_to_checkin() {
        let (app, _) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        let response = app.oneshot(get("/")).await.unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/PEO/checkin");
    }

    #[tokio::test]
    async fn unknown_page_renders_checkin() {
        let (app, _) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        let (status, html) = send(&app, get("/PEO/nowhere")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"checkin-page\""));

        let (_, html) = send(&app, get("/PEO")).await;
        assert!(html.contains("id=\"checkin-page\""));
    }

    #[tokio::test]
    async fn nested_unknown_path_renders_checkin() {
        let (app, _) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        let (status, html) = send(&app, get("/PEO/judging/extra")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"checkin-page\""));
    }

    #[tokio::test]
    async fn page_loads_do_not_announce_the_roster() {
        let (app, state) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        send(&app, post_form("/PEO/admin/import", &[("csv", CSV)])).await;
        let mut open_tab = state.sse().subscribe();

        let (status, _) = send(&app, get("/PEO/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(open_tab.try_recv().is_err());

        let id = state.roster().read().await.participants()[0].id.clone();
        send(&app, post_form(&format!("/PEO/participants/{id}/check-in"), &[])).await;
        assert!(open_tab.try_recv().is_ok());
    }

    #[tokio::test]
    async fn blank_test_data_count_uses_the_default() {
        let (app, state) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        let (status, html) = send(&app, post_form("/PEO/admin/test-data", &[("count", "")])).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Test data generated successfully!"));
        assert_eq!(
            state.roster().read().await.len(),
            AppConfig::default().test_data_count
        );
    }

    #[tokio::test]
    async fn import_check_in_and_judge_through_forms() {
        let store = FlakyStore::new(MemoryParticipantStore::new());
        let (app, state) = app_with(store);

        let (_, html) = send(&app, post_form("/PEO/admin/import", &[("csv", CSV)])).await;
        assert!(html.contains("Participants imported successfully!"));

        let id = state.roster().read().await.participants()[0].id.clone();
        let (_, html) = send(
            &app,
            post_form(&format!("/PEO/participants/{id}/check-in"), &[]),
        )
        .await;
        assert!(html.contains("<td>checked in</td>"));

        let (_, html) = send(&app, get("/PEO/judging")).await;
        assert!(html.contains("0001 - Team A"));

        let (_, html) = send(
            &app,
            post_form(
                "/PEO/judging",
                &[
                    ("team_id", id.as_str()),
                    ("criteria1", "5"),
                    ("criteria2", "5"),
                    ("criteria3", "5"),
                    ("criteria4", "5"),
                    ("criteria5", "5"),
                    ("comments", "ok"),
                ],
            ),
        )
        .await;
        assert!(html.contains("Judging submitted successfully!"));

        let (_, html) = send(&app, get("/PEO/leaderboard")).await;
        assert!(html.contains("<td>25</td>"));
    }

    #[tokio::test]
    async fn judging_without_team_shows_validation_notice() {
        let (app, _) = app_with(FlakyStore::new(MemoryParticipantStore::new()));
        let (_, html) = send(&app, post_form("/PEO/judging", &[("criteria1", "4")])).await;
        assert!(html.contains("Please select a team to judge."));
    }

    #[tokio::test]
    async fn offline_store_shows_per_operation_notices() {
        let store = FlakyStore::new(MemoryParticipantStore::new());
        let (app, _) = app_with(store.clone());
        store.go_offline();

        let (_, html) = send(&app, get("/PEO/checkin")).await;
        assert!(html.contains("The app will work in offline mode"));

        let (_, html) = send(&app, post_form("/PEO/participants/x/waiting", &[])).await;
        assert!(html.contains("You are currently offline. Changes will sync when you reconnect."));

        let (_, html) = send(&app, post_form("/PEO/admin/test-data", &[("count", "3")])).await;
        assert!(html.contains("Error generating test data."));
    }

    #[tokio::test]
    async fn search_fragment_filters_rows() {
        let store = FlakyStore::new(MemoryParticipantStore::new());
        let (app, _) = app_with(store);
        send(&app, post_form("/PEO/admin/import", &[("csv", CSV)])).await;

        let (_, rows) = send(&app, get("/PEO/fragments/roster?search=TEAM")).await;
        assert!(rows.contains("Team A"));
        let (_, rows) = send(&app, get("/PEO/fragments/roster?search=zzz")).await;
        assert!(rows.is_empty());
    }
}
