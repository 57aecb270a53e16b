//! Typed arguments for each operation.
//!
//! Parsing happens after the dispatcher has checked that every required key is
//! present, so the only failure left here is a value of the wrong JSON type,
//! which is reported as a missing parameter.

use serde_json::Value;

use crate::backend::{ContainerSpec, StartHostConfig};
use crate::dispatch::errors::WorkerError;
use crate::dispatch::registry::Subcommand;
use crate::dispatch::request::Parameters;

/// Arguments naming a container on a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerArgs {
    /// Engine address.
    pub server: String,
    /// Container name or identifier.
    pub container: String,
}

impl ContainerArgs {
    /// Reads `server_name` and `container_name`.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if either value is absent or not a string.
    pub fn parse(parameters: &Parameters, operation: Subcommand) -> Result<Self, WorkerError> {
        Ok(Self {
            server: parameters.require_str("server_name", operation)?.to_owned(),
            container: parameters
                .require_str("container_name", operation)?
                .to_owned(),
        })
    }
}

/// Arguments naming an image on a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArgs {
    /// Engine address.
    pub server: String,
    /// Image reference.
    pub image: String,
}

impl ImageArgs {
    /// Reads `server_name` and `image_name`.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if either value is absent or not a string.
    pub fn parse(parameters: &Parameters, operation: Subcommand) -> Result<Self, WorkerError> {
        Ok(Self {
            server: parameters.require_str("server_name", operation)?.to_owned(),
            image: parameters.require_str("image_name", operation)?.to_owned(),
        })
    }
}

/// Arguments for `PullImage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullArgs {
    /// Image to pull and its server.
    pub target: ImageArgs,
    /// Whether the registry may be reached without TLS verification.
    pub insecure_registry: bool,
}

impl PullArgs {
    /// Reads the image arguments plus `insecure_registry`.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` for absent or mistyped values.
    pub fn parse(parameters: &Parameters) -> Result<Self, WorkerError> {
        let operation = Subcommand::PullImage;
        let target = ImageArgs::parse(parameters, operation)?;
        let insecure_registry = parameters.require_bool("insecure_registry", operation)?;
        Ok(Self {
            target,
            insecure_registry,
        })
    }
}

/// Arguments for `CreateContainer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// Engine address.
    pub server: String,
    /// Container to create.
    pub spec: ContainerSpec,
}

impl CreateArgs {
    /// Reads the image, name, command, hostname and port of the new container.
    ///
    /// `container_command` is either a whitespace-separated string or an array
    /// of strings. `container_ports` is a single port given as a string or a
    /// number.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` for absent or mistyped values.
    pub fn parse(parameters: &Parameters) -> Result<Self, WorkerError> {
        let operation = Subcommand::CreateContainer;
        let server = parameters.require_str("server_name", operation)?.to_owned();
        let image = parameters.require_str("image_name", operation)?.to_owned();
        let name = parameters.require_str("container_name", operation)?.to_owned();
        let command = parse_command(parameters.require("container_command", operation)?)
            .ok_or(WorkerError::missing_parameter("container_command", operation))?;
        let hostname = parameters
            .require_str("container_hostname", operation)?
            .to_owned();
        let port = parse_port(parameters.require("container_ports", operation)?)
            .ok_or(WorkerError::missing_parameter("container_ports", operation))?;

        Ok(Self {
            server,
            spec: ContainerSpec {
                image,
                name,
                command,
                hostname,
                ports: vec![port],
            },
        })
    }
}

/// Arguments for `StartContainer`.
#[derive(Debug, Clone, PartialEq)]
pub struct StartArgs {
    /// Container to start and its server.
    pub target: ContainerArgs,
    /// Host configuration passed through unchanged.
    pub host: StartHostConfig,
}

impl StartArgs {
    /// Reads the container arguments plus `container_binds` and
    /// `port_bindings`.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` for absent or mistyped values.
    pub fn parse(parameters: &Parameters) -> Result<Self, WorkerError> {
        let operation = Subcommand::StartContainer;
        let target = ContainerArgs::parse(parameters, operation)?;
        let binds = parameters.require("container_binds", operation)?.clone();
        let port_bindings = parameters.require("port_bindings", operation)?.clone();
        Ok(Self {
            target,
            host: StartHostConfig {
                binds,
                port_bindings,
            },
        })
    }
}

fn parse_command(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(command) => Some(command.split_whitespace().map(str::to_owned).collect()),
        Value::Array(parts) => parts
            .iter()
            .map(|part| part.as_str().map(str::to_owned))
            .collect(),
        _ => None,
    }
}

fn parse_port(value: &Value) -> Option<String> {
    match value {
        Value::String(port) if !port.trim().is_empty() => Some(port.trim().to_owned()),
        Value::Number(port) => port.as_u64().map(|port| port.to_string()),
        _ => None,
    }
}
