use std::time::SystemTime;

use indexmap::IndexMap;

use crate::dao::models::{Category, Participant, ParticipantStatus};

/// In-memory copy of the participant collection.
///
/// Replaced wholesale after every successful fetch; never patched in place.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    refreshed_at: Option<SystemTime>,
}

impl Roster {
    /// Build a roster from an explicit list, stamped with the given time.
    pub fn from_participants(participants: Vec<Participant>, at: SystemTime) -> Self {
        Self {
            participants,
            refreshed_at: Some(at),
        }
    }

    /// Swap in a freshly fetched list.
    pub fn replace(&mut self, participants: Vec<Participant>, at: SystemTime) {
        self.participants = participants;
        self.refreshed_at = Some(at);
    }

    /// Drop every participant, as when the collection turns out to be missing.
    pub fn clear(&mut self, at: SystemTime) {
        self.participants.clear();
        self.refreshed_at = Some(at);
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Time of the last replace or clear.
    pub fn refreshed_at(&self) -> Option<SystemTime> {
        self.refreshed_at
    }

    /// Participants whose team number, team name or first name contains
    /// `term`, ignoring case. An empty term keeps everyone.
    pub fn filter(&self, term: &str) -> Vec<&Participant> {
        let needle = term.to_lowercase();
        self.participants
            .iter()
            .filter(|participant| {
                needle.is_empty()
                    || participant.team_number.to_lowercase().contains(&needle)
                    || participant.team_name.to_lowercase().contains(&needle)
                    || participant.first_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Participants ready to be judged, in roster order.
    pub fn checked_in(&self) -> Vec<&Participant> {
        self.with_status(ParticipantStatus::CheckedIn)
    }

    /// Judged participants of `category`, highest score first.
    ///
    /// The sort is stable, so ties keep their roster order. A missing score
    /// ranks as zero.
    pub fn leaderboard(&self, category: Category) -> Vec<&Participant> {
        let mut ranked: Vec<&Participant> = self
            .with_status(ParticipantStatus::Judged)
            .into_iter()
            .filter(|participant| participant.category == category)
            .collect();
        ranked.sort_by_key(|participant| std::cmp::Reverse(participant.score.unwrap_or(0)));
        ranked
    }

    /// Both leaderboards, junior first.
    pub fn leaderboards(&self) -> IndexMap<Category, Vec<&Participant>> {
        [Category::Junior, Category::Senior]
            .into_iter()
            .map(|category| (category, self.leaderboard(category)))
            .collect()
    }

    fn with_status(&self, status: ParticipantStatus) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|participant| participant.status == status)
            .collect()
    }
}
