//! Per-delivery request lifecycle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use dockworker_config::ApiVersion;

use crate::backend::BackendFactory;
use crate::bus::Channel;

use super::errors::WorkerError;
use super::notification::{COMPLETED_TITLE, FAILED_TITLE, Notification, OperationOutcome};
use super::operations::BackendSession;
use super::registry::{OperationRegistry, Subcommand};
use super::request::{CorrelationId, Delivery, Parameters};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Runs one delivery at a time through the acknowledge, resolve, execute and
/// reply sequence.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    backend: Arc<dyn BackendFactory>,
    api_version: ApiVersion,
}

impl Dispatcher {
    /// Creates a dispatcher over a fixed registry and backend factory.
    pub fn new(
        registry: Arc<OperationRegistry>,
        backend: Arc<dyn BackendFactory>,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            registry,
            backend,
            api_version,
        }
    }

    /// Processes one delivery to completion.
    ///
    /// The delivery is acknowledged before anything else happens and a
    /// `started` reply follows. Exactly one terminal reply and one
    /// notification are then emitted. Failures are additionally logged once at
    /// error level and reported to the output channel. Collaborator write
    /// failures are logged and never interrupt the sequence.
    pub fn process<C: Channel + ?Sized>(
        &self,
        delivery: Delivery,
        channel: &mut C,
    ) -> OperationOutcome {
        let Delivery {
            tag,
            correlation_id,
            reply_to,
            parameters,
        } = delivery;

        if let Err(error) = channel.acknowledge(tag) {
            warn!(
                target: DISPATCH_TARGET,
                delivery_tag = %tag,
                error = %error,
                "failed to acknowledge delivery"
            );
        }
        reply(channel, &reply_to, &correlation_id, &Notification::Started);

        match self.execute(&parameters) {
            Ok((subcommand, data)) => {
                complete(channel, &reply_to, &correlation_id, subcommand, data)
            }
            Err(error) => fail(channel, &reply_to, &correlation_id, &error),
        }
    }

    fn execute(&self, parameters: &Parameters) -> Result<(Subcommand, Value), WorkerError> {
        let (subcommand, operation) = self.registry.resolve(parameters.subcommand())?;
        parameters.ensure_present(subcommand)?;
        debug!(
            target: DISPATCH_TARGET,
            subcommand = %subcommand,
            "dispatching operation"
        );
        let session = BackendSession::new(self.backend.as_ref(), self.api_version);
        let data = operation.execute(parameters, &session)?;
        Ok((subcommand, data))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

fn reply<C: Channel + ?Sized>(
    channel: &mut C,
    reply_to: &str,
    correlation_id: &CorrelationId,
    notification: &Notification,
) {
    if let Err(error) = channel.reply(reply_to, correlation_id, notification) {
        warn!(
            target: DISPATCH_TARGET,
            reply_to,
            correlation_id = %correlation_id,
            error = %error,
            "failed to send reply"
        );
    }
}

fn notify<C: Channel + ?Sized>(
    channel: &mut C,
    title: &str,
    message: &str,
    outcome: &OperationOutcome,
    correlation_id: &CorrelationId,
) {
    if let Err(error) = channel.notify(title, message, outcome.status(), correlation_id) {
        warn!(
            target: DISPATCH_TARGET,
            correlation_id = %correlation_id,
            error = %error,
            "failed to send notification"
        );
    }
}

fn complete<C: Channel + ?Sized>(
    channel: &mut C,
    reply_to: &str,
    correlation_id: &CorrelationId,
    subcommand: Subcommand,
    data: Value,
) -> OperationOutcome {
    let outcome = OperationOutcome::Completed { data };
    reply(channel, reply_to, correlation_id, &outcome.notification());
    let message = format!("DockerWorker successfully executed {subcommand}. See logs.");
    notify(channel, COMPLETED_TITLE, &message, &outcome, correlation_id);
    info!(
        target: DISPATCH_TARGET,
        subcommand = %subcommand,
        correlation_id = %correlation_id,
        "operation completed"
    );
    outcome
}

fn fail<C: Channel + ?Sized>(
    channel: &mut C,
    reply_to: &str,
    correlation_id: &CorrelationId,
    failure: &WorkerError,
) -> OperationOutcome {
    error!(
        target: DISPATCH_TARGET,
        kind = failure.kind(),
        correlation_id = %correlation_id,
        error = %failure,
        "operation failed"
    );
    let message = failure.to_string();
    let outcome = OperationOutcome::Failed {
        message: message.clone(),
    };
    reply(channel, reply_to, correlation_id, &outcome.notification());
    notify(channel, FAILED_TITLE, &message, &outcome, correlation_id);
    if let Err(error) = channel.report_error(&message) {
        warn!(
            target: DISPATCH_TARGET,
            error = %error,
            "failed to report error"
        );
    }
    outcome
}
