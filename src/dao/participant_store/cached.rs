//! Offline read cache layered over another [`ParticipantStore`].

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::warn;

use crate::dao::{
    models::{NewParticipant, Participant, ParticipantPatch},
    participant_store::ParticipantStore,
    storage::StorageResult,
};

/// Keeps the last successful `fetch_all` result and serves it while the
/// wrapped backend is unreachable.
///
/// Only reads are cached. Writes go straight to the backend and fail as
/// usual when it is down.
#[derive(Clone)]
pub struct CachedParticipantStore {
    backend: Arc<dyn ParticipantStore>,
    snapshot: Arc<RwLock<Option<Vec<Participant>>>>,
}

impl CachedParticipantStore {
    /// Wrap `backend` with an initially empty cache.
    pub fn new(backend: Arc<dyn ParticipantStore>) -> Self {
        Self {
            backend,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    async fn fetch_all(&self) -> StorageResult<Vec<Participant>> {
        match self.backend.fetch_all().await {
            Ok(participants) => {
                *self.snapshot.write().await = Some(participants.clone());
                Ok(participants)
            }
            Err(err) if err.is_unavailable() => {
                let cached = self.snapshot.read().await.clone();
                match cached {
                    Some(participants) => {
                        warn!(
                            error = %err,
                            count = participants.len(),
                            "storage unreachable; serving cached participants"
                        );
                        Ok(participants)
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}

impl ParticipantStore for CachedParticipantStore {
    fn fetch_all(&self) -> BoxFuture<'static, StorageResult<Vec<Participant>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_all().await })
    }

    fn create_one(&self, data: NewParticipant) -> BoxFuture<'static, StorageResult<()>> {
        self.backend.create_one(data)
    }

    fn update_one(
        &self,
        id: String,
        patch: ParticipantPatch,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.backend.update_one(id, patch)
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.backend.health_check()
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.backend.try_reconnect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{
        models::{Category, ParticipantStatus},
        participant_store::{memory::MemoryParticipantStore, testing::FlakyStore},
        storage::StorageError,
    };

    fn sample() -> NewParticipant {
        NewParticipant {
            team_number: "0001".into(),
            team_name: "Team A1".into(),
            first_name: "Emma".into(),
            last_name: "Brown".into(),
            grade: 5,
            school_name: "High School A".into(),
            category: Category::Junior,
            arrival_time: "10:30".into(),
            status: ParticipantStatus::Registered,
        }
    }

    #[tokio::test]
    async fn serves_snapshot_while_backend_is_offline() {
        let memory = MemoryParticipantStore::new();
        memory.insert(sample());
        let flaky = FlakyStore::new(memory);
        let cached = CachedParticipantStore::new(Arc::new(flaky.clone()));

        assert_eq!(ParticipantStore::fetch_all(&cached).await.unwrap().len(), 1);

        flaky.go_offline();
        let served = ParticipantStore::fetch_all(&cached).await.unwrap();
        assert_eq!(served.len(), 1);
        assert_eq!(served[0].team_number, "0001");
    }

    #[tokio::test]
    async fn offline_without_snapshot_reports_the_error() {
        let flaky = FlakyStore::new(MemoryParticipantStore::new());
        flaky.go_offline();
        let cached = CachedParticipantStore::new(Arc::new(flaky));

        let err = ParticipantStore::fetch_all(&cached).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn writes_are_not_cached() {
        let flaky = FlakyStore::new(MemoryParticipantStore::new());
        let cached = CachedParticipantStore::new(Arc::new(flaky.clone()));
        ParticipantStore::fetch_all(&cached).await.unwrap();

        flaky.go_offline();
        let err = cached.create_one(sample()).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }
}
