use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use tracing::info;
use uuid::Uuid;

use crate::dao::{
    models::{NewParticipant, Participant, ParticipantPatch},
    participant_store::ParticipantStore,
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{AllDocsResponse, CouchParticipantDocument, DESIGN_PREFIX},
};

const ALL_DOCS: &str = "_all_docs";

/// Ids reach the URL unescaped, so only plain document ids are accepted.
fn check_document_id(id: &str) -> CouchResult<()> {
    let plain = !id.is_empty()
        && !id.starts_with('_')
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if plain {
        Ok(())
    } else {
        Err(CouchDaoError::InvalidDocumentId { id: id.to_owned() })
    }
}

/// CouchDB-backed [`ParticipantStore`]; one database plays the collection role.
#[derive(Clone)]
pub struct CouchParticipantStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchParticipantStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        info!(database = %store.database, "connected to CouchDB");
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.database_url(), path);
        self.authorized(self.client.request(method, url))
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> CouchResult<reqwest::Response> {
        builder
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: path.to_owned(),
                source,
            })
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let url = self.database_url();
        let response = self
            .send(self.authorized(self.client.get(&url)), &url)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let created = self
                    .send(self.authorized(self.client.put(&url)), &url)
                    .await?;
                if created.status().is_success() {
                    info!(database = %self.database, "created CouchDB database");
                    Ok(())
                } else {
                    Err(CouchDaoError::RequestStatus {
                        path: url,
                        status: created.status(),
                    })
                }
            }
            other => Err(CouchDaoError::RequestStatus {
                path: url,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::GET, doc_id), doc_id)
            .await?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: doc_id.to_owned(),
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: doc_id.to_owned(),
                source,
            })
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .send(self.request(Method::PUT, doc_id).json(document), doc_id)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_owned(),
                status: response.status(),
            })
        }
    }

    async fn fetch_all(&self) -> CouchResult<Vec<Participant>> {
        let response = self
            .send(
                self.request(Method::GET, ALL_DOCS)
                    .query(&[("include_docs", "true")]),
                ALL_DOCS,
            )
            .await?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_owned(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_owned(),
                source,
            }
        })?;

        let mut participants = Vec::with_capacity(payload.rows.len());
        for row in payload.rows {
            if row.id.starts_with(DESIGN_PREFIX) {
                continue;
            }
            let Some(doc) = row.doc else {
                continue;
            };
            let document: CouchParticipantDocument =
                from_value(doc).map_err(|source| CouchDaoError::DeserializeDocument {
                    doc_id: row.id.clone(),
                    source,
                })?;
            participants.push(document.into_participant().0);
        }

        Ok(participants)
    }

    async fn create_one(&self, data: NewParticipant) -> CouchResult<()> {
        let doc_id = Uuid::new_v4().simple().to_string();
        let document = CouchParticipantDocument::new(doc_id.clone(), data);
        self.put_document(&doc_id, &document).await
    }

    async fn update_one(&self, id: String, patch: ParticipantPatch) -> CouchResult<()> {
        check_document_id(&id)?;
        let existing = self.get_document::<CouchParticipantDocument>(&id).await?;
        let (mut participant, rev) = existing.into_participant();
        participant.apply(&patch);
        let document = CouchParticipantDocument::from_participant(participant, rev);
        self.put_document(&id, &document).await
    }

    async fn health_check(&self) -> CouchResult<()> {
        let url = self.database_url();
        let response = self
            .send(self.authorized(self.client.get(&url)), &url)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: url,
                status: response.status(),
            })
        }
    }
}

impl ParticipantStore for CouchParticipantStore {
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
        Box::pin(async move { store.health_check().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::storage::StorageError;

    #[test]
    fn generated_ids_are_accepted() {
        let id = Uuid::new_v4().simple().to_string();
        assert!(check_document_id(&id).is_ok());
        assert!(check_document_id("team-0001").is_ok());
    }

    #[test]
    fn ids_addressing_other_resources_are_rejected_as_missing() {
        for id in ["", "_design/app", "a/b", "p1?rev=1", "p1#x", "%2F", "a b"] {
            let err = check_document_id(id).unwrap_err();
            assert!(matches!(err, CouchDaoError::InvalidDocumentId { .. }), "{id}");
            assert!(matches!(StorageError::from(err), StorageError::NotFound { .. }));
        }
    }
}
