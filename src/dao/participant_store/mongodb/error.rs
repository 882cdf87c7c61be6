use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

use crate::dao::storage::StorageError;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Server error codes meaning the caller lacks the required rights.
const UNAUTHORIZED_CODE: i32 = 13;
const AUTHENTICATION_FAILED_CODE: i32 = 18;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to list participants")]
    ListParticipants {
        #[source]
        source: MongoError,
    },
    #[error("failed to create participant `{team_number}`")]
    CreateParticipant {
        team_number: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to update participant `{id}`")]
    UpdateParticipant {
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("participant `{id}` does not exist")]
    MissingParticipant { id: String },
}

impl MongoDaoError {
    fn driver_error(&self) -> Option<&MongoError> {
        match self {
            MongoDaoError::InvalidUri { source, .. }
            | MongoDaoError::ClientConstruction { source }
            | MongoDaoError::InitialPing { source, .. }
            | MongoDaoError::HealthPing { source }
            | MongoDaoError::ListParticipants { source }
            | MongoDaoError::CreateParticipant { source, .. }
            | MongoDaoError::UpdateParticipant { source, .. } => Some(source),
            MongoDaoError::MissingParticipant { .. } => None,
        }
    }
}

/// Failure classes the storage layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Unreachable,
    Forbidden,
    Other,
}

fn classify(err: &MongoError) -> FailureClass {
    match err.kind.as_ref() {
        ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => FailureClass::Unreachable,
        ErrorKind::ConnectionPoolCleared { .. } => FailureClass::Unreachable,
        ErrorKind::Authentication { .. } => FailureClass::Forbidden,
        ErrorKind::Command(command) => command_class(command.code),
        _ => FailureClass::Other,
    }
}

fn command_class(code: i32) -> FailureClass {
    match code {
        UNAUTHORIZED_CODE | AUTHENTICATION_FAILED_CODE => FailureClass::Forbidden,
        _ => FailureClass::Other,
    }
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        if let MongoDaoError::MissingParticipant { id } = &err {
            return StorageError::not_found(format!("participant `{id}`"));
        }

        let class = err
            .driver_error()
            .map(classify)
            .unwrap_or(FailureClass::Other);
        let message = err.to_string();
        match class {
            FailureClass::Unreachable => StorageError::unavailable(message, err),
            FailureClass::Forbidden => StorageError::permission_denied(message, err),
            FailureClass::Other => StorageError::backend(message, err),
        }
    }
}
