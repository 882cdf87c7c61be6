use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
///
/// Backends classify their failures so callers can tell a connectivity
/// problem from a permission problem without knowing the database in use.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend refused the operation for lack of rights.
    #[error("storage permission denied: {message}")]
    PermissionDenied {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The addressed collection or document does not exist.
    #[error("storage target not found: {message}")]
    NotFound { message: String },
    /// Any other backend failure.
    #[error("storage failure: {message}")]
    Backend {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a permission error from any backend failure.
    pub fn permission_denied(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::PermissionDenied {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        StorageError::NotFound {
            message: message.into(),
        }
    }

    /// Construct an unclassified backend error.
    pub fn backend(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Backend {
            message,
            source: Box::new(source),
        }
    }

    /// Whether the failure stems from the backend being unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}
