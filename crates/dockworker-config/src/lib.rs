//! Shared configuration for the dockworker daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then an
//! optional configuration file, then `DOCKWORKER_*` environment variables, then
//! command-line flags. The resolved [`Config`] carries the bus bridge endpoint,
//! the engine API version handed to every backend client, the per-request
//! backend timeout, and the logging settings.

mod api_version;
mod defaults;
mod logging;
mod socket;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use api_version::{ApiVersion, ApiVersionParseError};
pub use defaults::{
    DEFAULT_API_VERSION, DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT,
    default_api_version, default_backend_timeout, default_backend_timeout_secs,
    default_log_filter, default_log_filter_string, default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DOCKWORKER")]
#[serde(default)]
pub struct Config {
    /// Endpoint the bus bridge connects to.
    #[serde(default = "default_socket_endpoint")]
    #[ortho_config(default = default_socket_endpoint())]
    pub bus_socket: SocketEndpoint,
    /// Engine API version requested by backend clients.
    #[serde(default = "default_api_version")]
    #[ortho_config(default = DEFAULT_API_VERSION)]
    pub api_version: ApiVersion,
    /// Upper bound on a single backend request, in seconds.
    #[serde(default = "default_backend_timeout_secs")]
    #[ortho_config(default = DEFAULT_BACKEND_TIMEOUT_SECS)]
    pub backend_timeout_secs: u64,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_socket: default_socket_endpoint(),
            api_version: DEFAULT_API_VERSION,
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint the bus bridge connects to.
    #[must_use]
    pub fn bus_socket(&self) -> &SocketEndpoint {
        &self.bus_socket
    }

    /// Engine API version requested by backend clients.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Upper bound on a single backend request.
    #[must_use]
    pub const fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
