//! Worker bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use dockworker_config::{Config, SocketPreparationError};

use crate::backend::{BackendFactory, DockerBackendFactory};
use crate::dispatch::{Dispatcher, OperationRegistry};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Configuration source, abstracted for tests.
pub trait ConfigLoader: Send + Sync {
    /// Loads the worker configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no valid configuration can be built.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that always yields the same configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps a resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The bus socket directory could not be prepared.
    #[error("failed to prepare bus socket: {source}")]
    Socket {
        /// Filesystem error reported while preparing the socket directory.
        #[source]
        source: SocketPreparationError,
    },
}

/// A bootstrapped worker, ready to serve the bus socket.
pub struct Worker {
    config: Config,
    dispatcher: Dispatcher,
    telemetry: TelemetryHandle,
}

impl Worker {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The dispatcher wired to the configured backend.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Accessor for the telemetry handle.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Worker")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Builds the production engine backend from configuration.
#[must_use]
pub fn docker_backend(config: &Config) -> Arc<dyn BackendFactory> {
    Arc::new(DockerBackendFactory::new(config.backend_timeout()))
}

/// Bootstraps the worker with the supplied collaborators.
///
/// Loads configuration, installs telemetry, prepares the bus socket directory
/// and builds the dispatcher over the standard operation registry, with the
/// engine backend produced by `backend`. Each step is reported to `reporter`.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered.
pub fn bootstrap_with<B>(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
    backend: B,
) -> Result<Worker, BootstrapError>
where
    B: FnOnce(&Config) -> Arc<dyn BackendFactory>,
{
    reporter.bootstrap_starting();
    let result = prepare(loader, backend);
    match &result {
        Ok(worker) => reporter.bootstrap_succeeded(worker.config()),
        Err(error) => reporter.bootstrap_failed(error),
    }
    result
}

fn prepare<B>(loader: &dyn ConfigLoader, backend: B) -> Result<Worker, BootstrapError>
where
    B: FnOnce(&Config) -> Arc<dyn BackendFactory>,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    config
        .bus_socket()
        .prepare_filesystem()
        .map_err(|source| BootstrapError::Socket { source })?;

    let dispatcher = Dispatcher::new(
        Arc::new(OperationRegistry::standard()),
        backend(&config),
        config.api_version(),
    );
    Ok(Worker {
        config,
        dispatcher,
        telemetry,
    })
}
