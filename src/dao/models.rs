use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use validator::Validate;

/// Highest grade still competing in the junior category.
pub const JUNIOR_MAX_GRADE: i32 = 6;

/// Competition bracket a participant is ranked in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Category {
    /// Grades up to [`JUNIOR_MAX_GRADE`].
    Junior,
    /// Every grade above [`JUNIOR_MAX_GRADE`].
    Senior,
}

impl Category {
    /// Bracket a participant of the given grade belongs to.
    ///
    /// Only the test-data generator derives the category this way. Imported
    /// records keep whatever category the source file states, so the stored
    /// value can disagree with the grade.
    pub fn from_grade(grade: i32) -> Self {
        if grade <= JUNIOR_MAX_GRADE {
            Category::Junior
        } else {
            Category::Senior
        }
    }

    /// Label stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Junior => "Junior",
            Category::Senior => "Senior",
        }
    }

    /// Parse the exact stored label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Junior" => Some(Category::Junior),
            "Senior" => Some(Category::Senior),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a participant stands in the check-in and judging flow.
///
/// The usual order is registered, then checked in or waiting, then judged,
/// but nothing enforces it: any status may be written at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Imported or generated, not yet arrived.
    Registered,
    /// Present and ready to be judged.
    #[serde(rename = "checked in", alias = "checked-in", alias = "checked_in")]
    CheckedIn,
    /// Arrived but put on hold.
    Waiting,
    /// Scores recorded.
    Judged,
}

impl ParticipantStatus {
    /// Label stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipantStatus::Registered => "registered",
            ParticipantStatus::CheckedIn => "checked in",
            ParticipantStatus::Waiting => "waiting",
            ParticipantStatus::Judged => "judged",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant record as read back from the `participants` collection.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Identifier assigned by the store.
    pub id: String,
    /// Zero-padded team number, kept as text.
    pub team_number: String,
    pub team_name: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: i32,
    pub school_name: String,
    pub category: Category,
    /// Free-form arrival time; not validated.
    pub arrival_time: String,
    pub status: ParticipantStatus,
    /// Sum of the five criteria once judged.
    pub score: Option<i32>,
    pub comments: Option<String>,
    pub criteria1: Option<i32>,
    pub criteria2: Option<i32>,
    pub criteria3: Option<i32>,
    pub criteria4: Option<i32>,
    pub criteria5: Option<i32>,
}

impl Participant {
    /// Attach a store identifier to a freshly created record.
    pub fn from_new(id: impl Into<String>, data: NewParticipant) -> Self {
        Self {
            id: id.into(),
            team_number: data.team_number,
            team_name: data.team_name,
            first_name: data.first_name,
            last_name: data.last_name,
            grade: data.grade,
            school_name: data.school_name,
            category: data.category,
            arrival_time: data.arrival_time,
            status: data.status,
            score: None,
            comments: None,
            criteria1: None,
            criteria2: None,
            criteria3: None,
            criteria4: None,
            criteria5: None,
        }
    }

    /// Merge the fields set on `patch` into this record.
    pub fn apply(&mut self, patch: &ParticipantPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(score) = patch.score {
            self.score = Some(score);
        }
        if let Some(comments) = &patch.comments {
            self.comments = Some(comments.clone());
        }
        if patch.criteria1.is_some() {
            self.criteria1 = patch.criteria1;
        }
        if patch.criteria2.is_some() {
            self.criteria2 = patch.criteria2;
        }
        if patch.criteria3.is_some() {
            self.criteria3 = patch.criteria3;
        }
        if patch.criteria4.is_some() {
            self.criteria4 = patch.criteria4;
        }
        if patch.criteria5.is_some() {
            self.criteria5 = patch.criteria5;
        }
    }
}

/// Participant payload before the store assigns an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    pub team_number: String,
    pub team_name: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: i32,
    pub school_name: String,
    pub category: Category,
    pub arrival_time: String,
    pub status: ParticipantStatus,
}

/// Partial update merged into an existing participant document.
///
/// Unset fields are omitted from the serialized form so stores only touch
/// what the caller provided.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPatch {
    pub status: Option<ParticipantStatus>,
    pub score: Option<i32>,
    pub comments: Option<String>,
    pub criteria1: Option<i32>,
    pub criteria2: Option<i32>,
    pub criteria3: Option<i32>,
    pub criteria4: Option<i32>,
    pub criteria5: Option<i32>,
}

impl ParticipantPatch {
    /// Patch touching the status only.
    pub fn status(status: ParticipantStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch recording a judging result.
    pub fn judged(criteria: &JudgingCriteria, comments: String) -> Self {
        Self {
            status: Some(ParticipantStatus::Judged),
            score: Some(criteria.total()),
            comments: Some(comments),
            criteria1: Some(criteria.criteria1),
            criteria2: Some(criteria.criteria2),
            criteria3: Some(criteria.criteria3),
            criteria4: Some(criteria.criteria4),
            criteria5: Some(criteria.criteria5),
        }
    }
}

/// Five independent judge scores, each between 0 and 10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate, ToSchema)]
pub struct JudgingCriteria {
    #[validate(range(min = 0, max = 10))]
    pub criteria1: i32,
    #[validate(range(min = 0, max = 10))]
    pub criteria2: i32,
    #[validate(range(min = 0, max = 10))]
    pub criteria3: i32,
    #[validate(range(min = 0, max = 10))]
    pub criteria4: i32,
    #[validate(range(min = 0, max = 10))]
    pub criteria5: i32,
}

impl JudgingCriteria {
    /// Build the criteria from the five scores in form order.
    pub fn from_scores(scores: [i32; 5]) -> Self {
        let [criteria1, criteria2, criteria3, criteria4, criteria5] = scores;
        Self {
            criteria1,
            criteria2,
            criteria3,
            criteria4,
            criteria5,
        }
    }

    /// Arithmetic sum of the five scores.
    pub fn total(&self) -> i32 {
        self.criteria1 + self.criteria2 + self.criteria3 + self.criteria4 + self.criteria5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Participant {
        Participant::from_new(
            "p1",
            NewParticipant {
                team_number: "0001".into(),
                team_name: "Team A1".into(),
                first_name: "John".into(),
                last_name: "Doe".into(),
                grade: 6,
                school_name: "School X".into(),
                category: Category::Junior,
                arrival_time: "08:15".into(),
                status: ParticipantStatus::Registered,
            },
        )
    }

    #[test]
    fn category_follows_grade_threshold() {
        assert_eq!(Category::from_grade(5), Category::Junior);
        assert_eq!(Category::from_grade(6), Category::Junior);
        assert_eq!(Category::from_grade(7), Category::Senior);
        assert_eq!(Category::from_grade(8), Category::Senior);
    }

    #[test]
    fn status_uses_stored_labels() {
        let json = serde_json::to_string(&ParticipantStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked in\"");
        let parsed: ParticipantStatus = serde_json::from_str("\"checked-in\"").unwrap();
        assert_eq!(parsed, ParticipantStatus::CheckedIn);
    }

    #[test]
    fn participant_serializes_camel_case_without_empty_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["teamNumber"], "0001");
        assert_eq!(value["category"], "Junior");
        assert_eq!(value["status"], "registered");
        assert!(value.get("score").is_none());
        assert!(value.get("criteria1").is_none());
    }

    #[test]
    fn judged_patch_merges_score_and_criteria() {
        let criteria = JudgingCriteria::from_scores([1, 2, 3, 4, 5]);
        let mut participant = sample();
        participant.apply(&ParticipantPatch::judged(&criteria, "nice".into()));

        assert_eq!(participant.status, ParticipantStatus::Judged);
        assert_eq!(participant.score, Some(15));
        assert_eq!(participant.comments.as_deref(), Some("nice"));
        assert_eq!(participant.criteria5, Some(5));
        assert_eq!(participant.team_name, "Team A1");
    }

    #[test]
    fn criteria_outside_range_fail_validation() {
        assert!(JudgingCriteria::from_scores([0, 10, 5, 5, 5]).validate().is_ok());
        assert!(JudgingCriteria::from_scores([0, 11, 5, 5, 5]).validate().is_err());
        assert!(JudgingCriteria::from_scores([-1, 0, 0, 0, 0]).validate().is_err());
    }
}
