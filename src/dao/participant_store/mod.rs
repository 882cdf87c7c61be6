pub mod cached;
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;
#[cfg(test)]
pub mod testing;

use crate::dao::models::{NewParticipant, Participant, ParticipantPatch};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Name of the collection (or database) holding participant documents.
pub const PARTICIPANT_COLLECTION_NAME: &str = "participants";

/// Abstraction over the persistence layer for the participant collection.
pub trait ParticipantStore: Send + Sync {
    /// Read every participant document.
    fn fetch_all(&self) -> BoxFuture<'static, StorageResult<Vec<Participant>>>;
    /// Append one participant; the store assigns its identifier.
    fn create_one(&self, data: NewParticipant) -> BoxFuture<'static, StorageResult<()>>;
    /// Merge the set fields of `patch` into the participant `id`.
    fn update_one(&self, id: String, patch: ParticipantPatch)
    -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
