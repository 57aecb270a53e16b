//! Container lifecycle handlers.

use serde_json::Value;

use super::Operation;
use super::arguments::{ContainerArgs, CreateArgs, StartArgs};
use super::session::BackendSession;
use crate::dispatch::errors::WorkerError;
use crate::dispatch::registry::Subcommand;
use crate::dispatch::request::Parameters;

/// Seconds the engine waits for a container to exit before killing it.
pub const STOP_TIMEOUT_SECS: u16 = 10;

/// Handler for `StopContainer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopContainer;

impl Operation for StopContainer {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = ContainerArgs::parse(parameters, Subcommand::StopContainer)?;
        session.run(
            Subcommand::StopContainer,
            &args.server,
            "No such container is running currently",
            |client| client.stop(&args.container, STOP_TIMEOUT_SECS),
        )
    }
}

/// Handler for `RemoveContainer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveContainer;

impl Operation for RemoveContainer {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = ContainerArgs::parse(parameters, Subcommand::RemoveContainer)?;
        session.run(
            Subcommand::RemoveContainer,
            &args.server,
            "No such container found",
            |client| client.remove_container(&args.container),
        )
    }
}

/// Handler for `CreateContainer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateContainer;

impl Operation for CreateContainer {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = CreateArgs::parse(parameters)?;
        session.run(
            Subcommand::CreateContainer,
            &args.server,
            "Unable to create the requested container",
            |client| client.create_container(&args.spec),
        )
    }
}

/// Handler for `StartContainer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartContainer;

impl Operation for StartContainer {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = StartArgs::parse(parameters)?;
        session.run(
            Subcommand::StartContainer,
            &args.target.server,
            "No such container found to start",
            |client| client.start(&args.target.container, &args.host),
        )
    }
}
