use std::fmt::Write;

use super::escape_html;
use crate::{
    dao::models::{Participant, ParticipantStatus},
    state::Roster,
};

/// Action offered next to a participant in the roster.
///
/// Each action becomes a small form posting to the matching controller route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    CheckIn(String),
    MarkWaiting(String),
}

impl UiAction {
    /// Actions available for the participant's current status.
    ///
    /// Registered participants can be checked in or put on hold; waiting ones
    /// can still be checked in. Nothing is offered afterwards.
    pub fn for_participant(participant: &Participant) -> Vec<UiAction> {
        let id = &participant.id;
        match participant.status {
            ParticipantStatus::Registered => vec![
                UiAction::CheckIn(id.clone()),
                UiAction::MarkWaiting(id.clone()),
            ],
            ParticipantStatus::Waiting => vec![UiAction::CheckIn(id.clone())],
            ParticipantStatus::CheckedIn | ParticipantStatus::Judged => Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UiAction::CheckIn(_) => "Check In",
            UiAction::MarkWaiting(_) => "Waiting",
        }
    }

    /// Route the action posts to.
    pub fn form_action(&self, base: &str) -> String {
        match self {
            UiAction::CheckIn(id) => format!("{base}/participants/{id}/check-in"),
            UiAction::MarkWaiting(id) => format!("{base}/participants/{id}/waiting"),
        }
    }

    fn class(&self) -> &'static str {
        match self {
            UiAction::CheckIn(_) => "check-in-btn",
            UiAction::MarkWaiting(_) => "waiting-btn",
        }
    }

    fn render(&self, base: &str) -> String {
        format!(
            "<form class=\"inline\" method=\"post\" action=\"{action}\">\
             <button type=\"submit\" class=\"action-button {class}\">{label}</button></form>",
            action = escape_html(&self.form_action(base)),
            class = self.class(),
            label = self.label(),
        )
    }
}

/// Check-in page: search box plus the filtered roster table.
pub fn render(base: &str, roster: &Roster, search: &str) -> String {
    let fragment_url = escape_html(&format!("{base}/fragments/roster"));
    format!(
        "<h1>Participant Check-in</h1>\
         <input type=\"search\" id=\"search-input\" name=\"search\" \
         placeholder=\"Search by team number, team name or first name\" value=\"{search}\">\
         <table><thead><tr><th>Team Number</th><th>Team Name</th><th>First Name</th>\
         <th>Last Name</th><th>Grade</th><th>School</th><th>Category</th>\
         <th>Arrival Time</th><th>Status</th><th>Actions</th></tr></thead>\
         <tbody id=\"participants-body\">{rows}</tbody></table>\
         <script>(()=>{{\
         const searchInput=document.getElementById('search-input');\
         searchInput.addEventListener('input',async()=>{{\
         const response=await fetch('{fragment_url}?search='+encodeURIComponent(searchInput.value));\
         if(response.ok){{document.getElementById('participants-body').innerHTML=await response.text();}}\
         }});\
         }})();</script>",
        search = escape_html(search),
        rows = rows(base, &roster.filter(search)),
    )
}

/// Table rows for `participants`, served alone as the search fragment.
pub fn rows(base: &str, participants: &[&Participant]) -> String {
    let mut html = String::new();
    for participant in participants {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>",
            escape_html(&participant.team_number),
            escape_html(&participant.team_name),
            escape_html(&participant.first_name),
            escape_html(&participant.last_name),
            participant.grade,
            escape_html(&participant.school_name),
            participant.category,
            escape_html(&participant.arrival_time),
            participant.status,
        );
        for action in UiAction::for_participant(participant) {
            html.push_str(&action.render(base));
        }
        html.push_str("</td></tr>");
    }
    html
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{dao::models::Category, state::roster::tests::participant};

    #[test]
    fn actions_follow_status() {
        let registered = participant("a", "A", Category::Junior, ParticipantStatus::Registered, None);
        assert_eq!(
            UiAction::for_participant(&registered),
            vec![
                UiAction::CheckIn("a".into()),
                UiAction::MarkWaiting("a".into())
            ]
        );

        let waiting = participant("b", "B", Category::Junior, ParticipantStatus::Waiting, None);
        assert_eq!(
            UiAction::for_participant(&waiting),
            vec![UiAction::CheckIn("b".into())]
        );

        let judged = participant("c", "C", Category::Senior, ParticipantStatus::Judged, Some(9));
        assert!(UiAction::for_participant(&judged).is_empty());
    }

    #[test]
    fn actions_post_to_participant_routes() {
        assert_eq!(
            UiAction::CheckIn("abc".into()).form_action("/PEO"),
            "/PEO/participants/abc/check-in"
        );
        assert_eq!(
            UiAction::MarkWaiting("abc".into()).form_action("/PEO"),
            "/PEO/participants/abc/waiting"
        );
    }

    #[test]
    fn rows_escape_participant_text() {
        let mut sneaky = participant("x", "<Owls>", Category::Junior, ParticipantStatus::CheckedIn, None);
        sneaky.first_name = "A&B".into();
        let html = rows("/PEO", &[&sneaky]);
        assert!(html.contains("&lt;Owls&gt;"));
        assert!(html.contains("A&amp;B"));
        assert!(html.contains("<td>checked in</td>"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn page_applies_the_search_filter() {
        let roster = Roster::from_participants(
            vec![
                participant("1", "Rocket Owls", Category::Junior, ParticipantStatus::Registered, None),
                participant("2", "Blue Sharks", Category::Senior, ParticipantStatus::Registered, None),
            ],
            SystemTime::UNIX_EPOCH,
        );
        let html = render("/PEO", &roster, "sharks");
        assert!(html.contains("Blue Sharks"));
        assert!(!html.contains("Rocket Owls"));
        assert!(html.contains("value=\"sharks\""));
        assert!(html.contains("/PEO/fragments/roster"));
    }
}
