//! Image handlers.

use serde_json::Value;

use super::Operation;
use super::arguments::{ImageArgs, PullArgs};
use super::session::BackendSession;
use crate::dispatch::errors::WorkerError;
use crate::dispatch::registry::Subcommand;
use crate::dispatch::request::Parameters;

/// Handler for `RemoveImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveImage;

impl Operation for RemoveImage {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = ImageArgs::parse(parameters, Subcommand::RemoveImage)?;
        session.run(
            Subcommand::RemoveImage,
            &args.server,
            "No such image found",
            |client| client.remove_image(&args.image),
        )
    }
}

/// Handler for `PullImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PullImage;

impl Operation for PullImage {
    fn execute(
        &self,
        parameters: &Parameters,
        session: &BackendSession<'_>,
    ) -> Result<Value, WorkerError> {
        let args = PullArgs::parse(parameters)?;
        session.run(
            Subcommand::PullImage,
            &args.target.server,
            "No such image found",
            |client| client.pull(&args.target.image, args.insecure_registry),
        )
    }
}
