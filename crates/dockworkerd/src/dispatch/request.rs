//! Request model handed to the dispatcher.
//!
//! A [`Delivery`] is what the bus hands over for one message: the handle used
//! to acknowledge it, the correlation identifier and reply destination taken
//! from the message metadata, and the parameter mapping from the body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::WorkerError;
use super::registry::Subcommand;

/// Key holding the requested operation name.
pub const SUBCOMMAND_KEY: &str = "subcommand";

/// Bus handle identifying a delivered message for acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DeliveryTag(u64);

impl DeliveryTag {
    /// Wraps a raw delivery tag.
    #[must_use]
    pub const fn new(tag: u64) -> Self {
        Self(tag)
    }

    /// Raw delivery tag.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeliveryTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque token linking a request to its notifications.
///
/// Publishers send either strings or integers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "RawCorrelationId", into = "String")]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wraps a correlation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCorrelationId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawCorrelationId> for CorrelationId {
    fn from(raw: RawCorrelationId) -> Self {
        match raw {
            RawCorrelationId::Text(text) => Self(text),
            RawCorrelationId::Number(number) => Self(number.to_string()),
        }
    }
}

/// String-keyed parameter mapping carried in the request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Extracts `body.parameters`.
    ///
    /// A body without a `parameters` object yields an empty mapping so the
    /// request still runs through the lifecycle and fails on resolution.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        body.get("parameters")
            .and_then(Value::as_object)
            .cloned()
            .map(Self)
            .unwrap_or_default()
    }

    /// Looks up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The requested subcommand, when present as a string.
    #[must_use]
    pub fn subcommand(&self) -> Option<&str> {
        self.get(SUBCOMMAND_KEY).and_then(Value::as_str)
    }

    /// Checks that every field `operation` requires is present.
    ///
    /// Fields are checked in declaration order and the first absent one is
    /// reported.
    pub fn ensure_present(&self, operation: Subcommand) -> Result<(), WorkerError> {
        match operation
            .required_fields()
            .iter()
            .find(|field| !self.0.contains_key(**field))
        {
            Some(field) => Err(WorkerError::missing_parameter(*field, operation)),
            None => Ok(()),
        }
    }

    /// Returns a required value of any JSON type.
    pub fn require(&self, field: &'static str, operation: Subcommand) -> Result<&Value, WorkerError> {
        self.get(field)
            .ok_or(WorkerError::missing_parameter(field, operation))
    }

    /// Returns a required string value.
    pub fn require_str(
        &self,
        field: &'static str,
        operation: Subcommand,
    ) -> Result<&str, WorkerError> {
        self.require(field, operation)?
            .as_str()
            .ok_or(WorkerError::missing_parameter(field, operation))
    }

    /// Returns a required boolean value.
    pub fn require_bool(
        &self,
        field: &'static str,
        operation: Subcommand,
    ) -> Result<bool, WorkerError> {
        self.require(field, operation)?
            .as_bool()
            .ok_or(WorkerError::missing_parameter(field, operation))
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

/// One delivered message, owned by the dispatcher for a single `process` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Acknowledgement handle.
    pub tag: DeliveryTag,
    /// Correlation identifier from the message metadata.
    pub correlation_id: CorrelationId,
    /// Reply destination from the message metadata.
    pub reply_to: String,
    /// Parameters from the message body.
    pub parameters: Parameters,
}

impl Delivery {
    /// Builds a delivery from message metadata and a raw JSON body.
    #[must_use]
    pub fn from_body(
        tag: DeliveryTag,
        correlation_id: CorrelationId,
        reply_to: impl Into<String>,
        body: &Value,
    ) -> Self {
        Self {
            tag,
            correlation_id,
            reply_to: reply_to.into(),
            parameters: Parameters::from_body(body),
        }
    }
}
