//! Behavioural tests for the worker run loop.

use std::cell::RefCell;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use dockworker_config::Config;

use crate::backend::BackendFactory;
use crate::bootstrap::ConfigLoader;
use crate::health::HealthReporter;
use crate::process::{ProcessError, WorkerPlan, run_worker_with};

use super::support::{
    FailingConfigLoader, HealthEvent, MockFactory, RecordingHealthReporter, TestConfigLoader,
    TestShutdownSignal,
};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

struct ProcessWorld {
    loader: TestConfigLoader,
    reporter: Arc<RecordingHealthReporter>,
    shutdown: TestShutdownSignal,
    handle: Option<thread::JoinHandle<Result<(), ProcessError>>>,
    result: Option<Result<(), ProcessError>>,
}

impl ProcessWorld {
    fn new() -> Self {
        Self {
            loader: TestConfigLoader::new(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            shutdown: TestShutdownSignal::default(),
            handle: None,
            result: None,
        }
    }

    fn start<L: ConfigLoader + 'static>(&mut self, loader: L) {
        let reporter = Arc::clone(&self.reporter) as Arc<dyn HealthReporter>;
        let shutdown = self.shutdown.clone();
        self.handle = Some(thread::spawn(move || {
            run_worker_with(WorkerPlan {
                loader,
                reporter,
                backend: mock_backend,
                shutdown,
            })
        }));
    }

    fn wait_for(&self, expected: &HealthEvent) -> bool {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        while Instant::now() < deadline {
            if self.reporter.events().contains(expected) {
                return true;
            }
            thread::sleep(POLL_INTERVAL);
        }
        false
    }

    fn join(&mut self) -> &Result<(), ProcessError> {
        if self.result.is_none() {
            let handle = self.handle.take().expect("worker was not started");
            self.result = Some(handle.join().expect("worker thread panicked"));
        }
        self.result.as_ref().expect("worker result recorded")
    }
}

impl Drop for ProcessWorld {
    fn drop(&mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            drop(handle.join());
        }
    }
}

fn mock_backend(_config: &Config) -> Arc<dyn BackendFactory> {
    Arc::new(MockFactory::new())
}

#[fixture]
fn world() -> RefCell<ProcessWorld> {
    RefCell::new(ProcessWorld::new())
}

#[given("a worker running with a healthy configuration")]
fn given_healthy_worker(world: &RefCell<ProcessWorld>) {
    let mut world = world.borrow_mut();
    let loader = world.loader.clone();
    world.start(loader);
}

#[given("a worker running with a failing configuration")]
fn given_failing_worker(world: &RefCell<ProcessWorld>) {
    world.borrow_mut().start(FailingConfigLoader);
}

#[when("the listener becomes ready")]
fn when_listener_ready(world: &RefCell<ProcessWorld>) {
    let world = world.borrow();
    let endpoint = format!("unix://{}", world.loader.socket_path().display());
    assert!(
        world.wait_for(&HealthEvent::ListenerReady(endpoint)),
        "listener never became ready: {:?}",
        world.reporter.events()
    );
}

#[when("shutdown is requested")]
fn when_shutdown_requested(world: &RefCell<ProcessWorld>) {
    world.borrow().shutdown.trigger();
}

#[then("the worker exits cleanly")]
fn then_exits_cleanly(world: &RefCell<ProcessWorld>) {
    let mut world = world.borrow_mut();
    if let Err(error) = world.join() {
        panic!("worker failed: {error}");
    }
}

#[then("the worker exits with a bootstrap error")]
fn then_exits_with_bootstrap_error(world: &RefCell<ProcessWorld>) {
    let mut world = world.borrow_mut();
    let result = world.join();
    assert!(
        matches!(result, Err(ProcessError::Bootstrap { .. })),
        "expected a bootstrap error, got {result:?}"
    );
}

#[then("the reporter recorded readiness before shutdown")]
fn then_ready_before_shutdown(world: &RefCell<ProcessWorld>) {
    let events = world.borrow().reporter.events();
    let ready = events
        .iter()
        .position(|event| matches!(event, HealthEvent::ListenerReady(_)));
    let shutdown = events
        .iter()
        .position(|event| *event == HealthEvent::ShutdownRequested);
    assert!(
        matches!((ready, shutdown), (Some(ready), Some(shutdown)) if ready < shutdown),
        "unexpected health events: {events:?}"
    );
}

#[then("the bus socket is removed")]
fn then_socket_removed(world: &RefCell<ProcessWorld>) {
    let path = world.borrow().loader.socket_path();
    assert!(!path.exists(), "{} was left behind", path.display());
}

#[scenario(path = "tests/features/worker_process.feature")]
fn worker_process(world: RefCell<ProcessWorld>) {
    let _ = world;
}
