//! Container engine collaborators.
//!
//! Handlers never talk to the engine directly. They ask a [`BackendFactory`]
//! for a client bound to one server and issue a single call through the
//! [`BackendClient`] it returns. [`DockerBackendFactory`] is the production
//! implementation; tests substitute doubles.

mod docker;
mod errors;

use serde_json::Value;

use dockworker_config::ApiVersion;

pub use self::docker::DockerBackendFactory;
pub use self::errors::BackendError;

/// Tracing target for backend operations.
pub(crate) const BACKEND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::backend");

/// Builds engine clients bound to a server address.
pub trait BackendFactory: Send + Sync {
    /// Connects to `server` speaking the given engine API version.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unreachable`] when no client can be built for
    /// the address.
    fn connect(
        &self,
        server: &str,
        api_version: ApiVersion,
    ) -> Result<Box<dyn BackendClient>, BackendError>;
}

/// Engine operations used by the handlers.
///
/// Each call returns the engine's raw JSON result, or `null` when the call has
/// no body.
pub trait BackendClient {
    /// Stops a running container, waiting `timeout_secs` before killing it.
    fn stop(&self, container: &str, timeout_secs: u16) -> Result<Value, BackendError>;

    /// Removes a container.
    fn remove_container(&self, container: &str) -> Result<Value, BackendError>;

    /// Removes an image.
    fn remove_image(&self, image: &str) -> Result<Value, BackendError>;

    /// Pulls an image, optionally from a registry without TLS verification.
    fn pull(&self, image: &str, insecure_registry: bool) -> Result<Value, BackendError>;

    /// Creates a container.
    fn create_container(&self, spec: &ContainerSpec) -> Result<Value, BackendError>;

    /// Starts a created container with the requested host configuration.
    fn start(&self, container: &str, host: &StartHostConfig) -> Result<Value, BackendError>;
}

/// Container creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Image to create the container from.
    pub image: String,
    /// Container name.
    pub name: String,
    /// Command and arguments.
    pub command: Vec<String>,
    /// Hostname inside the container.
    pub hostname: String,
    /// Exposed ports, optionally suffixed with `/tcp` or `/udp`.
    pub ports: Vec<String>,
}

/// Host configuration supplied when starting a container.
#[derive(Debug, Clone, PartialEq)]
pub struct StartHostConfig {
    /// Volume binds as sent by the requester.
    pub binds: Value,
    /// Port bindings as sent by the requester.
    pub port_bindings: Value,
}

impl StartHostConfig {
    /// Whether any bind or port binding was actually requested.
    ///
    /// `null` and empty strings, arrays or objects request nothing.
    #[must_use]
    pub fn requests_bindings(&self) -> bool {
        [&self.binds, &self.port_bindings]
            .into_iter()
            .any(|value| match value {
                Value::Null => false,
                Value::String(text) => !text.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                Value::Object(entries) => !entries.is_empty(),
                Value::Bool(_) | Value::Number(_) => true,
            })
    }
}
