//! Shared engine connection step for operation handlers.

use serde_json::Value;
use tracing::warn;

use dockworker_config::ApiVersion;

use crate::backend::{BackendClient, BackendError, BackendFactory};
use crate::dispatch::errors::WorkerError;
use crate::dispatch::registry::Subcommand;
use crate::dispatch::dispatcher::DISPATCH_TARGET;

/// Rejection shown when a pull fails on registry transport security.
pub const REGISTRY_SECURITY_MESSAGE: &str = "Pull error due to registry check secure/insecure";

/// Rejection shown when binds or port bindings are passed to a start call.
pub const HOST_CONFIG_MESSAGE: &str =
    "Binds and port bindings must be set when the container is created";

/// Connects to one server per call and translates engine failures.
pub struct BackendSession<'a> {
    factory: &'a dyn BackendFactory,
    api_version: ApiVersion,
}

impl<'a> BackendSession<'a> {
    /// Creates a session using `factory` and the configured API version.
    #[must_use]
    pub const fn new(factory: &'a dyn BackendFactory, api_version: ApiVersion) -> Self {
        Self {
            factory,
            api_version,
        }
    }

    /// Connects to `server` and issues exactly one call through `call`.
    ///
    /// Connection and call failures are logged once at warn level and
    /// translated into [`WorkerError::BackendUnreachable`] or
    /// [`WorkerError::BackendRejected`], the latter carrying `rejection`.
    ///
    /// # Errors
    ///
    /// Returns the translated backend failure.
    pub fn run<F>(
        &self,
        operation: Subcommand,
        server: &str,
        rejection: &'static str,
        call: F,
    ) -> Result<Value, WorkerError>
    where
        F: FnOnce(&dyn BackendClient) -> Result<Value, BackendError>,
    {
        self.factory
            .connect(server, self.api_version)
            .and_then(|client| call(client.as_ref()))
            .map_err(|error| {
                warn!(
                    target: DISPATCH_TARGET,
                    operation = %operation,
                    server,
                    error = %error,
                    "engine call failed"
                );
                translate(operation, server, rejection, error)
            })
    }
}

fn translate(
    operation: Subcommand,
    server: &str,
    rejection: &'static str,
    error: BackendError,
) -> WorkerError {
    match error {
        BackendError::Unreachable { .. } => WorkerError::backend_unreachable(
            operation,
            format!(
                "Unable to {} because the docker server {server} could not be reached",
                operation.action()
            ),
        ),
        BackendError::Rejected { .. } => WorkerError::backend_rejected(operation, rejection),
        BackendError::InsecureRegistry { .. } => {
            WorkerError::backend_rejected(operation, REGISTRY_SECURITY_MESSAGE)
        }
        BackendError::HostConfigOnStart { .. } => {
            WorkerError::backend_rejected(operation, HOST_CONFIG_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_names_action_and_server() {
        let error = translate(
            Subcommand::StopContainer,
            "docker.local",
            "No such container is running currently",
            BackendError::unreachable("connection refused"),
        );
        assert_eq!(
            error.to_string(),
            "Unable to stop the container because the docker server docker.local could not be reached"
        );
    }

    #[test]
    fn rejection_uses_operation_message() {
        let error = translate(
            Subcommand::RemoveImage,
            "localhost",
            "No such image found",
            BackendError::rejected(Some(404), "no such image: testing"),
        );
        assert_eq!(
            error,
            WorkerError::backend_rejected(Subcommand::RemoveImage, "No such image found")
        );
    }

    #[test]
    fn registry_security_has_its_own_message() {
        let error = translate(
            Subcommand::PullImage,
            "localhost",
            "No such image found",
            BackendError::insecure_registry("http: server gave HTTP response to HTTPS client"),
        );
        assert_eq!(error.to_string(), REGISTRY_SECURITY_MESSAGE);
    }

    #[test]
    fn start_bindings_have_their_own_message() {
        let error = translate(
            Subcommand::StartContainer,
            "localhost",
            "No such container found to start",
            BackendError::host_config_on_start("binds [\"/tmp:/mnt\"]"),
        );
        assert_eq!(
            error,
            WorkerError::backend_rejected(Subcommand::StartContainer, HOST_CONFIG_MESSAGE)
        );
    }
}
