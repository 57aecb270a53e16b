//! Request dispatch for delivered work messages.
//!
//! Each delivery runs through the same sequence: acknowledge, reply
//! `started`, resolve the subcommand against the [`OperationRegistry`], check
//! required parameters, run the handler against the engine, then reply
//! `completed` or `failed` and publish a matching notification.
//!
//! ```json
//! {"parameters":{"subcommand":"StopContainer","server_name":"localhost","container_name":"testing"}}
//! ```
//!
//! Failures are classified as [`WorkerError`] values. None of them escape
//! [`Dispatcher::process`]; every one ends as a `failed` reply.

mod dispatcher;
mod errors;
mod notification;
pub mod operations;
mod registry;
mod request;

pub use self::dispatcher::Dispatcher;
pub use self::errors::WorkerError;
pub use self::notification::{
    COMPLETED_TITLE, FAILED_TITLE, Notification, NotificationStatus, OperationOutcome,
};
pub use self::registry::{OperationRegistry, Subcommand};
pub use self::request::{CorrelationId, Delivery, DeliveryTag, Parameters, SUBCOMMAND_KEY};
