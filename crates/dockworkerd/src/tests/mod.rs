//! Test suites for the Docker command worker.

mod bridge_behaviour;
mod process_behaviour;
mod support;
