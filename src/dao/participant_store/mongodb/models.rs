use mongodb::bson::{Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::models::{Category, Participant, ParticipantPatch, ParticipantStatus};

/// Participant document as laid out in the `participants` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoParticipantDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    team_number: String,
    team_name: String,
    first_name: String,
    last_name: String,
    grade: i32,
    school_name: String,
    category: Category,
    arrival_time: String,
    status: ParticipantStatus,
    #[serde(default)]
    score: Option<i32>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    criteria1: Option<i32>,
    #[serde(default)]
    criteria2: Option<i32>,
    #[serde(default)]
    criteria3: Option<i32>,
    #[serde(default)]
    criteria4: Option<i32>,
    #[serde(default)]
    criteria5: Option<i32>,
}

impl From<MongoParticipantDocument> for Participant {
    fn from(value: MongoParticipantDocument) -> Self {
        Self {
            id: value.id.to_hex(),
            team_number: value.team_number,
            team_name: value.team_name,
            first_name: value.first_name,
            last_name: value.last_name,
            grade: value.grade,
            school_name: value.school_name,
            category: value.category,
            arrival_time: value.arrival_time,
            status: value.status,
            score: value.score,
            comments: value.comments,
            criteria1: value.criteria1,
            criteria2: value.criteria2,
            criteria3: value.criteria3,
            criteria4: value.criteria4,
            criteria5: value.criteria5,
        }
    }
}

/// Filter matching the document with the given hex identifier, if it is one.
pub fn doc_id(id: &str) -> Option<Document> {
    ObjectId::parse_str(id).ok().map(|oid| doc! {"_id": oid})
}

/// `$set` body holding only the fields present on `patch`.
pub fn set_fields(patch: &ParticipantPatch) -> Document {
    let mut fields = Document::new();
    if let Some(status) = patch.status {
        fields.insert("status", status.as_str());
    }
    if let Some(score) = patch.score {
        fields.insert("score", score);
    }
    if let Some(comments) = &patch.comments {
        fields.insert("comments", comments.as_str());
    }
    let criteria = [
        ("criteria1", patch.criteria1),
        ("criteria2", patch.criteria2),
        ("criteria3", patch.criteria3),
        ("criteria4", patch.criteria4),
        ("criteria5", patch.criteria5),
    ];
    for (key, value) in criteria {
        if let Some(value) = value {
            fields.insert(key, value);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::JudgingCriteria;

    #[test]
    fn set_fields_skips_unset_values() {
        let fields = set_fields(&ParticipantPatch::status(ParticipantStatus::CheckedIn));
        assert_eq!(fields, doc! {"status": "checked in"});
    }

    #[test]
    fn set_fields_carries_judging_result() {
        let criteria = JudgingCriteria::from_scores([10, 9, 8, 7, 6]);
        let fields = set_fields(&ParticipantPatch::judged(&criteria, "solid".into()));
        assert_eq!(fields.get_str("status").unwrap(), "judged");
        assert_eq!(fields.get_i32("score").unwrap(), 40);
        assert_eq!(fields.get_i32("criteria5").unwrap(), 6);
        assert_eq!(fields.get_str("comments").unwrap(), "solid");
    }

    #[test]
    fn doc_id_rejects_non_object_ids() {
        assert!(doc_id("not-an-oid").is_none());
        assert!(doc_id("65f1c0ffee65f1c0ffee65f1").is_some());
    }
}
