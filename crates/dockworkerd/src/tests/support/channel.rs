//! Recording double for the bus, notifier and output collaborators.

use std::io;

use crate::bus::{Bus, BusError, Notifier, Output};
use crate::dispatch::{CorrelationId, DeliveryTag, Notification, NotificationStatus};

/// One call observed on the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Ack(DeliveryTag),
    Reply {
        reply_to: String,
        correlation_id: CorrelationId,
        notification: Notification,
    },
    Notify {
        title: String,
        message: String,
        status: NotificationStatus,
        correlation_id: CorrelationId,
    },
    Error(String),
}

/// Records every collaborator call in order.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    events: Vec<ChannelEvent>,
    broken: bool,
}

impl RecordingChannel {
    /// Channel that records calls but reports every write as failed.
    pub fn broken() -> Self {
        Self {
            events: Vec::new(),
            broken: true,
        }
    }

    pub fn events(&self) -> &[ChannelEvent] {
        &self.events
    }

    pub fn replies(&self) -> Vec<&Notification> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ChannelEvent::Reply { notification, .. } => Some(notification),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(&str, &str, NotificationStatus)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ChannelEvent::Notify {
                    title,
                    message,
                    status,
                    ..
                } => Some((title.as_str(), message.as_str(), *status)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ChannelEvent::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, event: ChannelEvent) -> Result<(), BusError> {
        self.events.push(event);
        if self.broken {
            Err(BusError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "bridge went away",
            )))
        } else {
            Ok(())
        }
    }
}

impl Bus for RecordingChannel {
    fn acknowledge(&mut self, tag: DeliveryTag) -> Result<(), BusError> {
        self.record(ChannelEvent::Ack(tag))
    }

    fn reply(
        &mut self,
        reply_to: &str,
        correlation_id: &CorrelationId,
        notification: &Notification,
    ) -> Result<(), BusError> {
        self.record(ChannelEvent::Reply {
            reply_to: reply_to.to_owned(),
            correlation_id: correlation_id.clone(),
            notification: notification.clone(),
        })
    }
}

impl Notifier for RecordingChannel {
    fn notify(
        &mut self,
        title: &str,
        message: &str,
        status: NotificationStatus,
        correlation_id: &CorrelationId,
    ) -> Result<(), BusError> {
        self.record(ChannelEvent::Notify {
            title: title.to_owned(),
            message: message.to_owned(),
            status,
            correlation_id: correlation_id.clone(),
        })
    }
}

impl Output for RecordingChannel {
    fn report_error(&mut self, message: &str) -> Result<(), BusError> {
        self.record(ChannelEvent::Error(message.to_owned()))
    }
}
