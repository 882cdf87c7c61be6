use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::models::{NewParticipant, Participant};

/// Prefix CouchDB reserves for design documents.
pub const DESIGN_PREFIX: &str = "_design/";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Participant document with its CouchDB bookkeeping fields.
///
/// The body reuses the domain shape so merged fields serialize under the
/// same camelCase keys as every other backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchParticipantDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub body: ParticipantBody,
}

/// Stored fields of a participant, without its identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    #[serde(flatten)]
    pub registration: NewParticipant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria2: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria3: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria4: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria5: Option<i32>,
}

impl CouchParticipantDocument {
    /// Fresh document for a newly registered participant.
    pub fn new(id: String, registration: NewParticipant) -> Self {
        Self {
            id,
            rev: None,
            body: ParticipantBody {
                registration,
                score: None,
                comments: None,
                criteria1: None,
                criteria2: None,
                criteria3: None,
                criteria4: None,
                criteria5: None,
            },
        }
    }

    /// Rebuild the document from a merged participant, keeping the revision.
    pub fn from_participant(participant: Participant, rev: Option<String>) -> Self {
        Self {
            id: participant.id,
            rev,
            body: ParticipantBody {
                registration: NewParticipant {
                    team_number: participant.team_number,
                    team_name: participant.team_name,
                    first_name: participant.first_name,
                    last_name: participant.last_name,
                    grade: participant.grade,
                    school_name: participant.school_name,
                    category: participant.category,
                    arrival_time: participant.arrival_time,
                    status: participant.status,
                },
                score: participant.score,
                comments: participant.comments,
                criteria1: participant.criteria1,
                criteria2: participant.criteria2,
                criteria3: participant.criteria3,
                criteria4: participant.criteria4,
                criteria5: participant.criteria5,
            },
        }
    }

    /// Split the document into the domain record and its revision.
    pub fn into_participant(self) -> (Participant, Option<String>) {
        let body = self.body;
        let mut participant = Participant::from_new(self.id, body.registration);
        participant.score = body.score;
        participant.comments = body.comments;
        participant.criteria1 = body.criteria1;
        participant.criteria2 = body.criteria2;
        participant.criteria3 = body.criteria3;
        participant.criteria4 = body.criteria4;
        participant.criteria5 = body.criteria5;
        (participant, self.rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{Category, ParticipantPatch, ParticipantStatus};

    fn stored_json() -> Value {
        serde_json::json!({
            "_id": "abc",
            "_rev": "1-x",
            "teamNumber": "0007",
            "teamName": "Team G1",
            "firstName": "Sophia",
            "lastName": "Davis",
            "grade": 8,
            "schoolName": "Middle School Y",
            "category": "Senior",
            "arrivalTime": "11:05",
            "status": "checked in"
        })
    }

    #[test]
    fn decodes_flat_document() {
        let doc: CouchParticipantDocument = serde_json::from_value(stored_json()).unwrap();
        let (participant, rev) = doc.into_participant();

        assert_eq!(rev.as_deref(), Some("1-x"));
        assert_eq!(participant.id, "abc");
        assert_eq!(participant.category, Category::Senior);
        assert_eq!(participant.status, ParticipantStatus::CheckedIn);
        assert_eq!(participant.score, None);
    }

    #[test]
    fn merged_document_keeps_revision_and_flat_keys() {
        let doc: CouchParticipantDocument = serde_json::from_value(stored_json()).unwrap();
        let (mut participant, rev) = doc.into_participant();
        participant.apply(&ParticipantPatch::status(ParticipantStatus::Waiting));

        let value =
            serde_json::to_value(CouchParticipantDocument::from_participant(participant, rev))
                .unwrap();
        assert_eq!(value["_rev"], "1-x");
        assert_eq!(value["status"], "waiting");
        assert_eq!(value["teamNumber"], "0007");
        assert!(value.get("score").is_none());
    }
}
