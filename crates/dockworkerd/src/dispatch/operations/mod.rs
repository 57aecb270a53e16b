//! Operation handlers, one per subcommand.
//!
//! Handlers parse their typed arguments, open a [`BackendSession`] against
//! `server_name` and issue a single engine call. The dispatcher has already
//! checked that every required key is present before a handler runs.

pub mod arguments;
mod container;
mod image;
mod session;

use serde_json::Value;

use crate::dispatch::errors::WorkerError;
use crate::dispatch::request::Parameters;

pub use self::container::{
    CreateContainer, RemoveContainer, STOP_TIMEOUT_SECS, StartContainer, StopContainer,
};
pub use self::image::{PullImage, RemoveImage};
pub use self::session::{BackendSession, HOST_CONFIG_MESSAGE, REGISTRY_SECURITY_MESSAGE};

/// A registered handler.
pub trait Operation: Send + Sync {
    /// Runs the operation against the backend.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` for mistyped values and a backend error
    /// kind when the engine call fails.
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError>;
}
