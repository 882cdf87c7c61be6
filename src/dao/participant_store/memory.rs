//! Process-local participant store, used when no database is configured and in tests.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

use crate::dao::{
    models::{NewParticipant, Participant, ParticipantPatch},
    participant_store::ParticipantStore,
    storage::{StorageError, StorageResult},
};

/// [`ParticipantStore`] keeping documents in a concurrent map.
///
/// Documents are returned in creation order so listings stay stable.
#[derive(Clone, Default)]
pub struct MemoryParticipantStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    documents: DashMap<String, (u64, Participant)>,
    sequence: AtomicU64,
}

impl MemoryParticipantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.inner.documents.len()
    }

    /// Whether the store holds no document.
    pub fn is_empty(&self) -> bool {
        self.inner.documents.is_empty()
    }

    /// Insert a document and return the identifier assigned to it.
    pub fn insert(&self, data: NewParticipant) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let seq = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
        self.inner
            .documents
            .insert(id.clone(), (seq, Participant::from_new(id.clone(), data)));
        id
    }

    /// Snapshot every document in creation order.
    pub fn snapshot(&self) -> Vec<Participant> {
        let mut entries: Vec<(u64, Participant)> = self
            .inner
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, participant)| participant).collect()
    }

    fn update(&self, id: &str, patch: &ParticipantPatch) -> StorageResult<()> {
        let mut entry = self
            .inner
            .documents
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found(format!("participant `{id}`")))?;
        entry.value_mut().1.apply(patch);
        Ok(())
    }
}

impl ParticipantStore for MemoryParticipantStore {
    fn fetch_all(&self) -> BoxFuture<'static, StorageResult<Vec<Participant>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.snapshot()) })
    }

    fn create_one(&self, data: NewParticipant) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = store.insert(data);
            debug!(participant_id = %id, "participant stored in memory");
            Ok(())
        })
    }

    fn update_one(
        &self,
        id: String,
        patch: ParticipantPatch,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update(&id, &patch) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{Category, ParticipantStatus};

    fn new_participant(team_number: &str) -> NewParticipant {
        NewParticipant {
            team_number: team_number.into(),
            team_name: format!("Team {team_number}"),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            grade: 7,
            school_name: "Middle School X".into(),
            category: Category::Senior,
            arrival_time: "09:00".into(),
            status: ParticipantStatus::Registered,
        }
    }

    #[tokio::test]
    async fn fetch_all_preserves_creation_order() {
        let store = MemoryParticipantStore::new();
        for number in ["0003", "0001", "0002"] {
            store.create_one(new_participant(number)).await.unwrap();
        }

        let numbers: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.team_number)
            .collect();
        assert_eq!(numbers, ["0003", "0001", "0002"]);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryParticipantStore::new();
        let id = store.insert(new_participant("0001"));

        store
            .update_one(id.clone(), ParticipantPatch::status(ParticipantStatus::Waiting))
            .await
            .unwrap();

        let stored = store.snapshot().remove(0);
        assert_eq!(stored.id, id);
        assert_eq!(stored.status, ParticipantStatus::Waiting);
        assert_eq!(stored.team_number, "0001");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = MemoryParticipantStore::new();
        let err = store
            .update_one("missing".into(), ParticipantPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
