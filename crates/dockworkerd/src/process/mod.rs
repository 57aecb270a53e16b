//! Worker process lifecycle: bootstrap, serve the bus socket, stop on signal.

mod errors;
mod launch;
mod shutdown;

pub use self::errors::ProcessError;
pub use self::launch::run_worker;
#[cfg(test)]
pub(crate) use self::launch::{WorkerPlan, run_worker_with};
pub use self::shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
