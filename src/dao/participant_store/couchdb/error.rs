//! Error types shared by the CouchDB storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`CouchDaoError`] failures.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures that can occur while interacting with CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// Required environment variable is missing.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or its response never arrived.
    #[error("failed to send CouchDB request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB answered with a status the operation does not expect.
    #[error("unexpected CouchDB response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be decoded.
    #[error("failed to decode CouchDB response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The identifier cannot name a participant document: it is empty, starts
    /// with the reserved `_` or contains characters outside `[A-Za-z0-9_-]`.
    #[error("`{id}` is not a valid participant document id")]
    InvalidDocumentId { id: String },
    /// A row of `_all_docs` did not hold a participant document.
    #[error("failed to deserialize CouchDB document `{doc_id}`")]
    DeserializeDocument {
        doc_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How a CouchDB failure is reported to the storage layer.
enum FailureClass {
    Unreachable,
    Forbidden,
    Missing,
    Other,
}

impl CouchDaoError {
    fn class(&self) -> FailureClass {
        match self {
            CouchDaoError::RequestSend { source, .. }
                if source.is_connect() || source.is_timeout() =>
            {
                FailureClass::Unreachable
            }
            CouchDaoError::RequestStatus { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureClass::Forbidden,
                StatusCode::NOT_FOUND => FailureClass::Missing,
                StatusCode::SERVICE_UNAVAILABLE => FailureClass::Unreachable,
                _ => FailureClass::Other,
            },
            CouchDaoError::InvalidDocumentId { .. } => FailureClass::Missing,
            _ => FailureClass::Other,
        }
    }
}

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        let message = err.to_string();
        match err.class() {
            FailureClass::Unreachable => StorageError::unavailable(message, err),
            FailureClass::Forbidden => StorageError::permission_denied(message, err),
            FailureClass::Missing => StorageError::not_found(message),
            FailureClass::Other => StorageError::backend(message, err),
        }
    }
}
