use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{
    config::MongoConfig,
    connection::{open, ping},
    error::{MongoDaoError, MongoResult},
    models::{MongoParticipantDocument, doc_id, set_fields},
};
use crate::dao::{
    models::{NewParticipant, Participant, ParticipantPatch},
    participant_store::{PARTICIPANT_COLLECTION_NAME, ParticipantStore},
    storage::StorageResult,
};

/// MongoDB-backed [`ParticipantStore`].
#[derive(Clone)]
pub struct MongoParticipantStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // Kept alive alongside the database handle it produced.
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.state.read().await.database.clone();
        ping(&database)
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = open(&self.config).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        info!("MongoDB connection re-established");
        Ok(())
    }
}

impl MongoParticipantStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open(&config).await?;
        info!(database = %config.database_name, "connected to MongoDB");

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });
        Ok(Self { inner })
    }

    async fn collection<T: Send + Sync>(&self) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(PARTICIPANT_COLLECTION_NAME)
    }

    async fn fetch_all(&self) -> MongoResult<Vec<Participant>> {
        let collection = self.collection::<MongoParticipantDocument>().await;

        let documents: Vec<MongoParticipantDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListParticipants { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListParticipants { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn create_one(&self, data: NewParticipant) -> MongoResult<()> {
        let collection = self.collection::<NewParticipant>().await;
        let result = collection.insert_one(&data).await.map_err(|source| {
            MongoDaoError::CreateParticipant {
                team_number: data.team_number.clone(),
                source,
            }
        })?;
        debug!(id = %result.inserted_id, "participant inserted");
        Ok(())
    }

    async fn update_one(&self, id: String, patch: ParticipantPatch) -> MongoResult<()> {
        let Some(filter) = doc_id(&id) else {
            return Err(MongoDaoError::MissingParticipant { id });
        };
        let fields = set_fields(&patch);
        let collection = self.collection::<MongoParticipantDocument>().await;

        if fields.is_empty() {
            let existing = collection
                .count_documents(filter)
                .await
                .map_err(|source| MongoDaoError::UpdateParticipant {
                    id: id.clone(),
                    source,
                })?;
            return if existing == 0 {
                Err(MongoDaoError::MissingParticipant { id })
            } else {
                Ok(())
            };
        }

        let result = collection
            .update_one(filter, doc! {"$set": fields})
            .await
            .map_err(|source| MongoDaoError::UpdateParticipant {
                id: id.clone(),
                source,
            })?;

        if result.matched_count == 0 {
            return Err(MongoDaoError::MissingParticipant { id });
        }
        Ok(())
    }
}

impl ParticipantStore for MongoParticipantStore {
    fn fetch_all(&self) -> BoxFuture<'static, StorageResult<Vec<Participant>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_all().await.map_err(Into::into) })
    }

    fn create_one(&self, data: NewParticipant) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_one(data).await.map_err(Into::into) })
    }

    fn update_one(
        &self,
        id: String,
        patch: ParticipantPatch,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_one(id, patch).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
