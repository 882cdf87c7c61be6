//! User-facing messages shown after an action completes or fails.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ServiceError;

/// Severity of a [`Notice`], used to style the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Message displayed to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

const ACCESS_DENIED: &str = "Access denied. Please check the database security rules.";
const OFFLINE_WRITE: &str = "You are currently offline. Changes will sync when you reconnect.";

/// Operator actions that report their outcome through a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadParticipants,
    UpdateStatus,
    SubmitJudging,
    Import,
    GenerateTestData,
}

impl Operation {
    /// Message confirming a successful run, for operations that announce one.
    pub fn success_notice(self) -> Option<Notice> {
        let message = match self {
            Operation::SubmitJudging => "Judging submitted successfully!",
            Operation::Import => "Participants imported successfully!",
            Operation::GenerateTestData => "Test data generated successfully!",
            Operation::LoadParticipants | Operation::UpdateStatus => return None,
        };
        Some(Notice::success(message))
    }

    /// Message describing why the operation failed, worded for this operation.
    ///
    /// Validation failures carry their own text. Bulk operations only ever
    /// report a generic message.
    pub fn failure_notice(self, err: &ServiceError) -> Notice {
        if let ServiceError::InvalidInput(message) = err {
            return Notice::warning(message.clone());
        }

        let message = match self {
            Operation::Import => "Error importing participants. Please check the CSV format.",
            Operation::GenerateTestData => "Error generating test data.",
            Operation::LoadParticipants => match err {
                e if e.is_offline() => {
                    "You are currently offline. The app will work in offline mode. Changes will sync when you reconnect."
                }
                ServiceError::PermissionDenied(_) => ACCESS_DENIED,
                _ => "Error loading participants. Please check your connection and try again.",
            },
            Operation::UpdateStatus => match err {
                e if e.is_offline() => OFFLINE_WRITE,
                ServiceError::PermissionDenied(_) => ACCESS_DENIED,
                _ => "Error updating status. Please try again.",
            },
            Operation::SubmitJudging => match err {
                e if e.is_offline() => OFFLINE_WRITE,
                ServiceError::PermissionDenied(_) => ACCESS_DENIED,
                _ => "Error submitting judging. Please try again.",
            },
        };
        Notice::error(message)
    }
}
