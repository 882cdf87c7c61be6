use std::fmt::Write;

use super::escape_html;
use crate::{
    dao::models::{Category, Participant},
    services::sse_events::EVENT_ROSTER_REFRESHED,
    state::Roster,
};

/// Ranking table body for one category.
pub fn rows(ranked: &[&Participant]) -> String {
    let mut html = String::new();
    for team in ranked {
        let score = team.score.map(|score| score.to_string()).unwrap_or_default();
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&team.team_number),
            escape_html(&team.team_name),
            team.category,
            team.status,
            score,
        );
    }
    html
}

/// Leaderboard page: junior then senior rankings, reloaded on every roster
/// refresh pushed over SSE.
pub fn render(roster: &Roster) -> String {
    let mut html = String::from("<h1>Leaderboard</h1>");
    for (category, ranked) in roster.leaderboards() {
        let id = match category {
            Category::Junior => "junior-leaderboard-body",
            Category::Senior => "senior-leaderboard-body",
        };
        let _ = write!(
            html,
            "<h2>{category}</h2><table><thead><tr><th>Team Number</th><th>Team Name</th>\
             <th>Category</th><th>Status</th><th>Score</th></tr></thead>\
             <tbody id=\"{id}\">{rows}</tbody></table>",
            rows = rows(&ranked),
        );
    }
    let _ = write!(
        html,
        "<script>\
         if(window.rosterEvents){{window.rosterEvents.close();}}\
         window.rosterEvents=new EventSource('/sse/roster');\
         window.rosterEvents.addEventListener('{EVENT_ROSTER_REFRESHED}',()=>{{\
         if(document.getElementById('leaderboard-page')){{window.location.reload();}}\
         }});\
         </script>"
    );
    html
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{dao::models::ParticipantStatus, state::roster::tests::participant};

    #[test]
    fn junior_board_comes_first_and_is_ranked() {
        let roster = Roster::from_participants(
            vec![
                participant("1", "Low", Category::Junior, ParticipantStatus::Judged, Some(12)),
                participant("2", "Senior", Category::Senior, ParticipantStatus::Judged, Some(44)),
                participant("3", "High", Category::Junior, ParticipantStatus::Judged, Some(31)),
            ],
            SystemTime::UNIX_EPOCH,
        );
        let html = render(&roster);

        let junior = html.find("junior-leaderboard-body").unwrap();
        let senior = html.find("senior-leaderboard-body").unwrap();
        assert!(junior < senior);

        let high = html.find("High").unwrap();
        let low = html.find("Low").unwrap();
        assert!(high < low && low < senior);
        assert!(html.contains("roster.refreshed"));
    }

    #[test]
    fn missing_score_renders_empty() {
        let unscored = participant("1", "Owls", Category::Junior, ParticipantStatus::Judged, None);
        assert!(rows(&[&unscored]).ends_with("<td>judged</td><td></td></tr>"));
    }
}
