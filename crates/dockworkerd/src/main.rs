//! Entry point for the `dockworkerd` worker.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match dockworkerd::run_worker() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            // Nothing more can be done if stderr itself is gone.
            drop(writeln!(stderr, "dockworkerd: {error}"));
            ExitCode::FAILURE
        }
    }
}
