//! Wire frames exchanged with the bus bridge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::{CorrelationId, Delivery, DeliveryTag, Notification, NotificationStatus};

use super::BusError;

/// One inbound delivery as relayed by the bridge.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeliveryFrame {
    /// Broker acknowledgement handle.
    pub delivery_tag: DeliveryTag,
    /// Correlation identifier from the message properties.
    pub correlation_id: CorrelationId,
    /// Reply destination from the message properties.
    pub reply_to: String,
    /// Decoded message body.
    #[serde(default)]
    pub body: Value,
}

impl DeliveryFrame {
    /// Parses a delivery from one JSONL line.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::MalformedDelivery`] if the bytes are not UTF-8 or
    /// the JSON lacks the delivery metadata.
    pub fn parse(bytes: &[u8]) -> Result<Self, BusError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|error| BusError::malformed(format!("invalid UTF-8: {error}")))?;
        serde_json::from_str(text.trim()).map_err(|error| BusError::malformed(error.to_string()))
    }

    /// Converts the frame into the dispatcher's request model.
    #[must_use]
    pub fn into_delivery(self) -> Delivery {
        Delivery::from_body(
            self.delivery_tag,
            self.correlation_id,
            self.reply_to,
            &self.body,
        )
    }
}

/// Outbound frame written back to the bridge.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusFrame {
    /// Acknowledges a delivery.
    Ack {
        /// Handle of the acknowledged delivery.
        delivery_tag: DeliveryTag,
    },
    /// Lifecycle notification for the reply destination.
    Reply {
        /// Destination queue or topic.
        reply_to: String,
        /// Correlation identifier of the request.
        correlation_id: CorrelationId,
        /// Notification body.
        payload: Notification,
    },
    /// Human-facing notification.
    Notify {
        /// Short title.
        title: String,
        /// Notification text.
        message: String,
        /// Terminal status.
        status: NotificationStatus,
        /// Correlation identifier of the request.
        correlation_id: CorrelationId,
    },
    /// User-facing error report.
    Error {
        /// Error text.
        message: String,
    },
}
