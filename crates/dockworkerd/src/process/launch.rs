//! Runs the worker until a shutdown signal arrives.

use std::sync::Arc;

use tracing::info;

use dockworker_config::Config;

use crate::backend::BackendFactory;
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with, docker_backend};
use crate::bus::BridgeConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::ProcessError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators needed to run the worker.
pub(crate) struct WorkerPlan<L, B, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) backend: B,
    pub(crate) shutdown: S,
}

/// Runs the worker with the production collaborators.
///
/// # Errors
///
/// Returns [`ProcessError`] when bootstrap, binding the bus socket or
/// installing signal handlers fails.
pub fn run_worker() -> Result<(), ProcessError> {
    run_worker_with(WorkerPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        backend: docker_backend,
        shutdown: SystemShutdownSignal,
    })
}

/// Runs the worker with injected collaborators.
pub(crate) fn run_worker_with<L, B, S>(plan: WorkerPlan<L, B, S>) -> Result<(), ProcessError>
where
    L: ConfigLoader,
    B: FnOnce(&Config) -> Arc<dyn BackendFactory>,
    S: ShutdownSignal,
{
    let WorkerPlan {
        loader,
        reporter,
        backend,
        shutdown,
    } = plan;

    info!(target: PROCESS_TARGET, "starting worker");
    let worker = bootstrap_with(&loader, reporter.as_ref(), backend)?;

    let listener = SocketListener::bind(worker.config().bus_socket())?;
    let handler = Arc::new(BridgeConnectionHandler::new(worker.dispatcher().clone()));
    let listener_handle = listener.start(handler)?;
    reporter.listener_ready(worker.config().bus_socket());

    let waited = shutdown.wait();
    reporter.shutdown_requested();
    listener_handle.shutdown();
    listener_handle.join()?;
    waited?;

    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
