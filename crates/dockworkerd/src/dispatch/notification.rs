//! Lifecycle notifications sent to the requester.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Title used for the human-facing notification after success.
pub const COMPLETED_TITLE: &str = "DockerWorker Executed Successfully";

/// Title used for the human-facing notification after failure.
pub const FAILED_TITLE: &str = "DockerWorker Failed";

/// Reply payload emitted on the request's reply destination.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Notification {
    /// The request was accepted and is being processed.
    Started,
    /// The operation succeeded; `data` is the raw backend result.
    Completed {
        /// Backend payload, `null` when the call returned nothing.
        data: Value,
    },
    /// The operation failed.
    Failed,
}

impl Notification {
    /// Whether this notification ends the lifecycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started)
    }
}

/// Terminal status carried by human-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The operation succeeded.
    Completed,
    /// The operation failed.
    Failed,
}

/// Result of running one handler.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// Handler succeeded with the given payload.
    Completed {
        /// Backend payload.
        data: Value,
    },
    /// Handler failed with a user-facing message.
    Failed {
        /// Message reported to the requester.
        message: String,
    },
}

impl OperationOutcome {
    /// The reply payload for this outcome.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Completed { data } => Notification::Completed { data: data.clone() },
            Self::Failed { .. } => Notification::Failed,
        }
    }

    /// The status shown in the human-facing notification.
    #[must_use]
    pub const fn status(&self) -> NotificationStatus {
        match self {
            Self::Completed { .. } => NotificationStatus::Completed,
            Self::Failed { .. } => NotificationStatus::Failed,
        }
    }
}
