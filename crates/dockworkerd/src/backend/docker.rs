//! Docker Engine client built on `bollard`.
//!
//! The dispatcher is synchronous, so each client owns a current-thread
//! runtime and blocks on every engine call. Clients are built per request and
//! dropped once the call returns.

use std::collections::HashMap;
use std::time::Duration;

use bollard::errors::Error as DockerError;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    CreateContainerOptionsBuilder, CreateImageOptionsBuilder, RemoveContainerOptions,
    RemoveImageOptions, StartContainerOptions, StopContainerOptionsBuilder,
};
use bollard::{ClientVersion, Docker};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use dockworker_config::ApiVersion;

use super::{
    BACKEND_TARGET, BackendClient, BackendError, BackendFactory, ContainerSpec, StartHostConfig,
};

/// Port the engine listens on when an HTTP address omits one.
const DEFAULT_ENGINE_PORT: u16 = 2375;

/// Builds `bollard` clients with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct DockerBackendFactory {
    timeout: Duration,
}

impl DockerBackendFactory {
    /// Creates a factory whose clients give up after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl BackendFactory for DockerBackendFactory {
    fn connect(
        &self,
        server: &str,
        api_version: ApiVersion,
    ) -> Result<Box<dyn BackendClient>, BackendError> {
        let address = EngineAddress::parse(server)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                BackendError::unreachable(format!("failed to start engine runtime: {error}"))
            })?;
        let version = ClientVersion {
            major_version: usize::from(api_version.major()),
            minor_version: usize::from(api_version.minor()),
        };
        let timeout = self.timeout.as_secs();

        debug!(
            target: BACKEND_TARGET,
            server,
            address = %address,
            api_version = %api_version,
            timeout_secs = timeout,
            "connecting to engine"
        );

        let docker = {
            let _guard = runtime.enter();
            match &address {
                #[cfg(unix)]
                EngineAddress::Unix(path) => Docker::connect_with_unix(path, timeout, &version),
                #[cfg(not(unix))]
                EngineAddress::Unix(_) => {
                    return Err(BackendError::unreachable(
                        "unix engine sockets are unsupported on this platform",
                    ));
                }
                EngineAddress::Http(url) => Docker::connect_with_http(url, timeout, &version),
            }
            .map_err(classify)?
        };

        Ok(Box::new(DockerClient { docker, runtime }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineAddress {
    Unix(String),
    Http(String),
}

impl EngineAddress {
    fn parse(server: &str) -> Result<Self, BackendError> {
        let server = server.trim();
        if let Some(path) = server.strip_prefix("unix://") {
            return Ok(Self::Unix(path.to_owned()));
        }

        let host = server
            .strip_prefix("tcp://")
            .or_else(|| server.strip_prefix("http://"))
            .unwrap_or(server)
            .trim_end_matches('/');
        if host.is_empty() || host.contains("://") {
            return Err(BackendError::unreachable(format!(
                "unsupported engine address '{server}'"
            )));
        }

        if has_port(host) {
            Ok(Self::Http(format!("http://{host}")))
        } else {
            Ok(Self::Http(format!("http://{host}:{DEFAULT_ENGINE_PORT}")))
        }
    }
}

impl std::fmt::Display for EngineAddress {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unix(path) => write!(formatter, "unix://{path}"),
            Self::Http(url) => formatter.write_str(url),
        }
    }
}

fn has_port(host: &str) -> bool {
    // Bracketed IPv6 literals carry colons of their own.
    let tail = host.rsplit_once(']').map_or(host, |(_, tail)| tail);
    tail.rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

struct DockerClient {
    docker: Docker,
    runtime: Runtime,
}

impl BackendClient for DockerClient {
    fn stop(&self, container: &str, timeout_secs: u16) -> Result<Value, BackendError> {
        let options = StopContainerOptionsBuilder::default()
            .t(i32::from(timeout_secs))
            .build();
        self.runtime
            .block_on(self.docker.stop_container(container, Some(options)))
            .map_err(classify)?;
        Ok(Value::Null)
    }

    fn remove_container(&self, container: &str) -> Result<Value, BackendError> {
        self.runtime
            .block_on(
                self.docker
                    .remove_container(container, None::<RemoveContainerOptions>),
            )
            .map_err(classify)?;
        Ok(Value::Null)
    }

    fn remove_image(&self, image: &str) -> Result<Value, BackendError> {
        let removed = self
            .runtime
            .block_on(
                self.docker
                    .remove_image(image, None::<RemoveImageOptions>, None),
            )
            .map_err(classify)?;
        to_payload(&removed)
    }

    fn pull(&self, image: &str, insecure_registry: bool) -> Result<Value, BackendError> {
        // Registry trust is engine configuration; the pull request has no
        // field for it.
        if insecure_registry {
            warn!(
                target: BACKEND_TARGET,
                image,
                "insecure registry requested; the engine decides registry trust from its own configuration"
            );
        }
        debug!(target: BACKEND_TARGET, image, "pulling image");
        let options = CreateImageOptionsBuilder::default().from_image(image).build();
        let progress: Vec<_> = self
            .runtime
            .block_on(
                self.docker
                    .create_image(Some(options), None, None)
                    .try_collect(),
            )
            .map_err(classify_pull)?;
        to_payload(&progress)
    }

    fn create_container(&self, spec: &ContainerSpec) -> Result<Value, BackendError> {
        let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
            .ports
            .iter()
            .map(|port| (exposed_port_key(port), HashMap::new()))
            .collect();
        let body = ContainerCreateBody {
            image: Some(spec.image.clone()),
            cmd: (!spec.command.is_empty()).then(|| spec.command.clone()),
            hostname: Some(spec.hostname.clone()),
            exposed_ports: Some(exposed_ports),
            ..Default::default()
        };
        let options = CreateContainerOptionsBuilder::default()
            .name(&spec.name)
            .build();
        let created = self
            .runtime
            .block_on(self.docker.create_container(Some(options), body))
            .map_err(classify)?;
        to_payload(&created)
    }

    fn start(&self, container: &str, host: &StartHostConfig) -> Result<Value, BackendError> {
        // Engine API 1.24 dropped host configuration on start; it must be
        // supplied at creation.
        if host.requests_bindings() {
            return Err(BackendError::host_config_on_start(format!(
                "binds {} and port bindings {} for {container}",
                host.binds, host.port_bindings
            )));
        }
        self.runtime
            .block_on(
                self.docker
                    .start_container(container, None::<StartContainerOptions>),
            )
            .map_err(classify)?;
        Ok(Value::Null)
    }
}

fn exposed_port_key(port: &str) -> String {
    if port.contains('/') {
        port.to_owned()
    } else {
        format!("{port}/tcp")
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, BackendError> {
    serde_json::to_value(value).map_err(|error| {
        BackendError::rejected(None, format!("engine response could not be encoded: {error}"))
    })
}

fn classify(error: DockerError) -> BackendError {
    match error {
        DockerError::DockerResponseServerError {
            status_code,
            message,
        } => BackendError::rejected(Some(status_code), message),
        DockerError::DockerStreamError { error } => BackendError::rejected(None, error),
        other => BackendError::unreachable(other.to_string()),
    }
}

fn classify_pull(error: DockerError) -> BackendError {
    match classify(error) {
        BackendError::Rejected { message, .. } if mentions_registry_security(&message) => {
            BackendError::insecure_registry(message)
        }
        other => other,
    }
}

fn mentions_registry_security(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["http response to https client", "insecure", "x509"]
        .iter()
        .any(|needle| message.contains(needle))
}
