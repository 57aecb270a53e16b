//! Subcommand allow-list and the registry mapping it to handlers.
//!
//! The registry is built once when the worker starts and never changes
//! afterwards. Lookups are exact, case-sensitive matches on the subcommand
//! name carried in the request parameters.

use std::collections::HashMap;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::errors::WorkerError;
use super::operations::{
    CreateContainer, Operation, PullImage, RemoveContainer, RemoveImage, StartContainer,
    StopContainer,
};

/// Operations the worker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Subcommand {
    /// Stops a running container.
    StopContainer,
    /// Removes a stopped container.
    RemoveContainer,
    /// Removes an image.
    RemoveImage,
    /// Pulls an image from its registry.
    PullImage,
    /// Creates a container from an image.
    CreateContainer,
    /// Starts a created container.
    StartContainer,
}

impl Subcommand {
    /// Parameters that must be present, in the order they are checked.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::StopContainer | Self::RemoveContainer => &["server_name", "container_name"],
            Self::RemoveImage => &["server_name", "image_name"],
            Self::PullImage => &["server_name", "image_name", "insecure_registry"],
            Self::CreateContainer => &[
                "server_name",
                "image_name",
                "container_name",
                "container_command",
                "container_hostname",
                "container_ports",
            ],
            Self::StartContainer => &[
                "server_name",
                "container_name",
                "container_binds",
                "port_bindings",
            ],
        }
    }

    /// Phrase used when the engine could not be reached.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::StopContainer => "stop the container",
            Self::RemoveContainer => "remove the container",
            Self::RemoveImage => "remove the image",
            Self::PullImage => "pull the image",
            Self::CreateContainer => "create the container",
            Self::StartContainer => "start the container",
        }
    }

    fn operation(self) -> Box<dyn Operation> {
        match self {
            Self::StopContainer => Box::new(StopContainer),
            Self::RemoveContainer => Box::new(RemoveContainer),
            Self::RemoveImage => Box::new(RemoveImage),
            Self::PullImage => Box::new(PullImage),
            Self::CreateContainer => Box::new(CreateContainer),
            Self::StartContainer => Box::new(StartContainer),
        }
    }
}

/// Immutable mapping from subcommand to handler.
pub struct OperationRegistry {
    handlers: HashMap<Subcommand, Box<dyn Operation>>,
}

impl OperationRegistry {
    /// Registry holding the built-in handler for every subcommand.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Subcommand::iter().map(|subcommand| (subcommand, subcommand.operation())))
    }

    /// Builds a registry from explicit entries.
    ///
    /// Later entries replace earlier ones for the same subcommand.
    pub fn new(entries: impl IntoIterator<Item = (Subcommand, Box<dyn Operation>)>) -> Self {
        Self {
            handlers: entries.into_iter().collect(),
        }
    }

    /// Resolves a requested subcommand name to its handler.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownSubcommand`] when the name is absent or
    /// does not match a registered subcommand exactly.
    pub fn resolve(
        &self,
        requested: Option<&str>,
    ) -> Result<(Subcommand, &dyn Operation), WorkerError> {
        requested
            .and_then(|name| Subcommand::from_str(name).ok())
            .and_then(|subcommand| {
                self.handlers
                    .get(&subcommand)
                    .map(|handler| (subcommand, handler.as_ref()))
            })
            .ok_or_else(|| WorkerError::unknown_subcommand(requested))
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().map(ToString::to_string).collect();
        names.sort();
        formatter
            .debug_struct("OperationRegistry")
            .field("handlers", &names)
            .finish()
    }
}
