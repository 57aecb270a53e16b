//! Message bus collaborators and the JSONL bridge that implements them.
//!
//! The dispatcher only sees the [`Bus`], [`Notifier`] and [`Output`] traits.
//! In production a broker-side bridge connects to the worker socket and
//! relays deliveries as JSON lines:
//!
//! ```json
//! {"delivery_tag":123,"correlation_id":"abc","reply_to":"me","body":{"parameters":{"subcommand":"StopContainer"}}}
//! ```
//!
//! The worker answers on the same connection with frames tagged by `kind`:
//!
//! ```json
//! {"kind":"ack","delivery_tag":123}
//! {"kind":"reply","reply_to":"me","correlation_id":"abc","payload":{"status":"started"}}
//! {"kind":"notify","title":"DockerWorker Failed","message":"…","status":"failed","correlation_id":"abc"}
//! {"kind":"error","message":"…"}
//! ```

mod channel;
mod connection;
mod errors;
mod frames;

use crate::dispatch::{CorrelationId, DeliveryTag, Notification, NotificationStatus};

pub use self::channel::JsonlChannel;
pub(crate) use self::connection::BridgeConnectionHandler;
pub use self::connection::MAX_FRAME_BYTES;
pub use self::errors::BusError;
pub use self::frames::{BusFrame, DeliveryFrame};

/// Tracing target for bus bridge operations.
pub(crate) const BUS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bus");

/// Acknowledgement and reply delivery.
pub trait Bus {
    /// Acknowledges a delivered message.
    ///
    /// # Errors
    ///
    /// Returns an error when the acknowledgement cannot be written.
    fn acknowledge(&mut self, tag: DeliveryTag) -> Result<(), BusError>;

    /// Sends a lifecycle notification to the reply destination.
    ///
    /// # Errors
    ///
    /// Returns an error when the reply cannot be written.
    fn reply(
        &mut self,
        reply_to: &str,
        correlation_id: &CorrelationId,
        notification: &Notification,
    ) -> Result<(), BusError>;
}

/// Human-facing notifications.
pub trait Notifier {
    /// Publishes a notification for the request identified by
    /// `correlation_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification cannot be written.
    fn notify(
        &mut self,
        title: &str,
        message: &str,
        status: NotificationStatus,
        correlation_id: &CorrelationId,
    ) -> Result<(), BusError>;
}

/// User-facing error reports.
pub trait Output {
    /// Reports an error message.
    ///
    /// # Errors
    ///
    /// Returns an error when the report cannot be written.
    fn report_error(&mut self, message: &str) -> Result<(), BusError>;
}

/// Everything the dispatcher writes to while processing a delivery.
pub trait Channel: Bus + Notifier + Output {}

impl<T: Bus + Notifier + Output + ?Sized> Channel for T {}
