//! Classified failures surfaced while dispatching a request.
//!
//! Every failure a request can hit is one of four kinds. Each kind carries a
//! message that is shown to the requester unchanged, so the display strings
//! here are part of the user-facing contract.

use thiserror::Error;

use super::registry::Subcommand;

/// Failure kinds recognised at the dispatcher boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    /// The request named no operation, or one outside the registry.
    #[error(
        "No valid subcommand given ({}). Nothing to do!",
        .subcommand.as_deref().unwrap_or("none")
    )]
    UnknownSubcommand {
        /// Requested name, if the request carried one as a string.
        subcommand: Option<String>,
    },

    /// A required parameter was absent or had the wrong type.
    #[error("Missing input {field} for {operation}")]
    MissingParameter {
        /// First absent or mistyped field.
        field: &'static str,
        /// Operation that required it.
        operation: Subcommand,
    },

    /// The engine endpoint could not be reached.
    #[error("{message}")]
    BackendUnreachable {
        /// Operation that needed the engine.
        operation: Subcommand,
        /// Message shown to the requester.
        message: String,
    },

    /// The engine endpoint answered but declined the operation.
    #[error("{message}")]
    BackendRejected {
        /// Operation the engine declined.
        operation: Subcommand,
        /// Message shown to the requester.
        message: String,
    },
}

impl WorkerError {
    /// Creates an unknown subcommand error.
    #[must_use]
    pub fn unknown_subcommand(subcommand: Option<&str>) -> Self {
        Self::UnknownSubcommand {
            subcommand: subcommand.map(str::to_owned),
        }
    }

    /// Creates a missing parameter error.
    #[must_use]
    pub const fn missing_parameter(field: &'static str, operation: Subcommand) -> Self {
        Self::MissingParameter { field, operation }
    }

    /// Creates an unreachable backend error.
    #[must_use]
    pub fn backend_unreachable(operation: Subcommand, message: impl Into<String>) -> Self {
        Self::BackendUnreachable {
            operation,
            message: message.into(),
        }
    }

    /// Creates a rejected backend error.
    #[must_use]
    pub fn backend_rejected(operation: Subcommand, message: impl Into<String>) -> Self {
        Self::BackendRejected {
            operation,
            message: message.into(),
        }
    }

    /// Stable identifier used in structured log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownSubcommand { .. } => "unknown_subcommand",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::BackendUnreachable { .. } => "backend_unreachable",
            Self::BackendRejected { .. } => "backend_rejected",
        }
    }
}
