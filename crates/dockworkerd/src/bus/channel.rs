//! JSONL implementation of the bus collaborators.

use std::io::Write;

use crate::dispatch::{CorrelationId, DeliveryTag, Notification, NotificationStatus};

use super::{Bus, BusError, BusFrame, Notifier, Output};

/// Writes bus frames as JSON lines, flushing after each frame.
pub struct JsonlChannel<W> {
    writer: W,
}

impl<W: Write> JsonlChannel<W> {
    /// Wraps an output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one frame as a JSONL line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation, writing or flushing fails.
    pub fn write_frame(&mut self, frame: &BusFrame) -> Result<(), BusError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Bus for JsonlChannel<W> {
    fn acknowledge(&mut self, tag: DeliveryTag) -> Result<(), BusError> {
        self.write_frame(&BusFrame::Ack { delivery_tag: tag })
    }

    fn reply(
        &mut self,
        reply_to: &str,
        correlation_id: &CorrelationId,
        notification: &Notification,
    ) -> Result<(), BusError> {
        self.write_frame(&BusFrame::Reply {
            reply_to: reply_to.to_owned(),
            correlation_id: correlation_id.clone(),
            payload: notification.clone(),
        })
    }
}

impl<W: Write> Notifier for JsonlChannel<W> {
    fn notify(
        &mut self,
        title: &str,
        message: &str,
        status: NotificationStatus,
        correlation_id: &CorrelationId,
    ) -> Result<(), BusError> {
        self.write_frame(&BusFrame::Notify {
            title: title.to_owned(),
            message: message.to_owned(),
            status,
            correlation_id: correlation_id.clone(),
        })
    }
}

impl<W: Write> Output for JsonlChannel<W> {
    fn report_error(&mut self, message: &str) -> Result<(), BusError> {
        self.write_frame(&BusFrame::Error {
            message: message.to_owned(),
        })
    }
}
