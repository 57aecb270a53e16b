//! Container engine API version negotiated by every backend client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine API version in `major.minor` form, for example `1.41`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    major: u16,
    minor: u16,
}

impl ApiVersion {
    /// Builds a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Major component.
    #[must_use]
    pub const fn major(self) -> u16 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub const fn minor(self) -> u16 {
        self.minor
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = ApiVersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().trim_start_matches('v');
        let (major, minor) = trimmed
            .split_once('.')
            .ok_or_else(|| ApiVersionParseError::new(input))?;
        let major = major.parse().map_err(|_| ApiVersionParseError::new(input))?;
        let minor = minor.parse().map_err(|_| ApiVersionParseError::new(input))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ApiVersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.to_string()
    }
}

/// Error returned when an API version is not in `major.minor` form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid engine API version '{0}': expected MAJOR.MINOR")]
pub struct ApiVersionParseError(String);

impl ApiVersionParseError {
    fn new(value: &str) -> Self {
        Self(value.to_owned())
    }
}
