//! Shared doubles and fixtures for the worker test suites.

mod backend;
mod channel;
mod config_loader;
mod logs;
mod reporter;
mod shutdown;

pub use backend::{
    MockClient, MockFactory, factory_expecting_connect, failing_factory, request, stop_request,
};
pub use channel::{ChannelEvent, RecordingChannel};
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use logs::LogCounter;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use shutdown::TestShutdownSignal;
