//! Error types for the bus bridge.

use std::io;

use thiserror::Error;

/// Errors raised while reading or writing bridge frames.
#[derive(Debug, Error)]
pub enum BusError {
    /// The connection failed.
    #[error("bus I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame could not be serialised.
    #[error("failed to encode bus frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// An inbound line was not a valid delivery.
    #[error("malformed delivery: {message}")]
    MalformedDelivery {
        /// Decoder diagnostic.
        message: String,
    },

    /// An inbound line exceeded the size limit.
    #[error("delivery exceeds {limit} bytes")]
    FrameTooLarge {
        /// Maximum accepted line length in bytes.
        limit: usize,
    },
}

impl BusError {
    /// Creates a malformed delivery error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDelivery {
            message: message.into(),
        }
    }
}
