//! Message-driven Docker command worker.
//!
//! `dockworkerd` receives job requests relayed from a work queue, runs one
//! container engine operation per request and reports a correlated
//! `started` → `completed` | `failed` lifecycle back to the requester.
//!
//! The crate is organised around the request lifecycle:
//!
//! - [`dispatch`] owns the request model, the subcommand registry, the
//!   operation handlers and the [`Dispatcher`] that ties them together.
//! - [`backend`] defines the engine collaborators and their `bollard`
//!   implementation.
//! - [`bus`] defines the acknowledgement, reply, notification and error
//!   output collaborators, plus the JSONL bridge protocol spoken on the worker
//!   socket.
//!
//! Bootstrap loads configuration through [`dockworker_config`], installs
//! structured telemetry and prepares the bus socket. Health reporting hooks
//! emit a structured event at each stage so operators can follow startup and
//! shutdown.
//!
//! Deliveries are processed strictly one at a time. Each is acknowledged
//! before any work starts, so a crash mid-operation loses the request rather
//! than replaying it.

pub mod backend;
mod bootstrap;
pub mod bus;
pub mod dispatch;
mod health;
mod process;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, Worker, bootstrap_with,
    docker_backend,
};
pub use dispatch::Dispatcher;
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{ProcessError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_worker};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
