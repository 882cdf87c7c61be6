//! Error types for the service and HTTP layers.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The storage backend cannot be reached.
    #[error("storage offline")]
    Offline(#[source] StorageError),
    /// No storage backend has been connected yet.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// The storage backend refused the operation.
    #[error("access denied")]
    PermissionDenied(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other storage failure.
    #[error("storage failure")]
    Storage(#[source] StorageError),
}

impl ServiceError {
    /// Whether the failure is a connectivity problem.
    pub fn is_offline(&self) -> bool {
        matches!(self, ServiceError::Offline(_) | ServiceError::Degraded)
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable { .. } => ServiceError::Offline(err),
            StorageError::PermissionDenied { .. } => ServiceError::PermissionDenied(err),
            StorageError::NotFound { message } => ServiceError::NotFound(message),
            StorageError::Backend { .. } => ServiceError::Storage(err),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The storage backend refused access.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Offline(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::PermissionDenied(source) => AppError::Forbidden(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Storage(source) => AppError::Internal(source.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Cause;

    impl std::fmt::Display for Cause {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("cause")
        }
    }

    impl std::error::Error for Cause {}

    #[test]
    fn storage_errors_are_classified() {
        let offline: ServiceError = StorageError::unavailable("down".into(), Cause).into();
        assert!(offline.is_offline());

        let denied: ServiceError = StorageError::permission_denied("no".into(), Cause).into();
        assert!(matches!(denied, ServiceError::PermissionDenied(_)));

        let missing: ServiceError = StorageError::not_found("participant `x`").into();
        assert!(matches!(missing, ServiceError::NotFound(ref m) if m == "participant `x`"));

        let other: ServiceError = StorageError::backend("boom".into(), Cause).into();
        assert!(matches!(other, ServiceError::Storage(_)));
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let response = AppError::from(ServiceError::Degraded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = AppError::from(ServiceError::InvalidInput("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let denied = ServiceError::PermissionDenied(StorageError::permission_denied(
            "no".into(),
            Cause,
        ));
        assert_eq!(
            AppError::from(denied).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
