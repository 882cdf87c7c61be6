use std::fmt::Write;

use super::escape_html;
use crate::{dto::participant::TeamOption, state::Roster};

const CRITERIA: [&str; 5] = [
    "Creativity",
    "Technical Skill",
    "Presentation",
    "Teamwork",
    "Problem Solving",
];

/// Team selector listing checked-in participants only.
pub fn team_select(roster: &Roster) -> String {
    let mut html = String::from(
        "<select id=\"team-select\" name=\"team_id\"><option value=\"\">Select a Team</option>",
    );
    for team in roster.checked_in().into_iter().map(TeamOption::from) {
        let _ = write!(
            html,
            "<option value=\"{}\">{}</option>",
            escape_html(&team.id),
            escape_html(&team.label)
        );
    }
    html.push_str("</select>");
    html
}

/// Judging page: team selector, five scores from 0 to 10 and comments.
pub fn render(base: &str, roster: &Roster) -> String {
    let mut html = format!(
        "<h1>Judging</h1><form method=\"post\" action=\"{action}\" id=\"judging-form\">\
         <label for=\"team-select\">Team</label>{select}",
        action = escape_html(&format!("{base}/judging")),
        select = team_select(roster),
    );
    for (index, name) in CRITERIA.iter().enumerate() {
        let field = format!("criteria{}", index + 1);
        let _ = write!(
            html,
            "<div class=\"criteria\"><label for=\"{field}\">{name}</label>\
             <select class=\"criteria-score\" id=\"{field}\" name=\"{field}\">\
             <option value=\"\">Score</option>"
        );
        for score in 0..=10 {
            let _ = write!(html, "<option value=\"{score}\">{score}</option>");
        }
        html.push_str("</select></div>");
    }
    html.push_str(
        "<label for=\"judge-comments\">Comments</label>\
         <textarea id=\"judge-comments\" name=\"comments\" rows=\"4\"></textarea>\
         <button type=\"submit\" id=\"submit-judging\">Submit Judging</button></form>",
    );
    html
}
