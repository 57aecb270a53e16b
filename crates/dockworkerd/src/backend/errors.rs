//! Error types for engine calls.

use thiserror::Error;

/// Failures reported by a [`super::BackendClient`] or
/// [`super::BackendFactory`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The engine could not be reached, or the call timed out.
    #[error("engine unreachable: {message}")]
    Unreachable {
        /// Transport-level cause.
        message: String,
    },

    /// The engine answered and declined the call.
    #[error("engine rejected request{}: {message}", .status.map(|code| format!(" ({code})")).unwrap_or_default())]
    Rejected {
        /// HTTP status, when the engine sent one.
        status: Option<u16>,
        /// Engine-provided reason.
        message: String,
    },

    /// A pull failed because the registry's transport security did not match
    /// what the engine expected.
    #[error("registry security mismatch: {message}")]
    InsecureRegistry {
        /// Engine-provided reason.
        message: String,
    },

    /// Binds or port bindings were supplied to a start call, which the engine
    /// only accepts at creation.
    #[error("host configuration not accepted on start: {message}")]
    HostConfigOnStart {
        /// What was refused.
        message: String,
    },
}

impl BackendError {
    /// Creates an unreachable error.
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a registry security error.
    #[must_use]
    pub fn insecure_registry(message: impl Into<String>) -> Self {
        Self::InsecureRegistry {
            message: message.into(),
        }
    }

    /// Creates an error for host configuration passed to a start call.
    #[must_use]
    pub fn host_config_on_start(message: impl Into<String>) -> Self {
        Self::HostConfigOnStart {
            message: message.into(),
        }
    }

    /// Whether the engine answered at all.
    #[must_use]
    pub const fn engine_answered(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::InsecureRegistry { .. })
    }
}
