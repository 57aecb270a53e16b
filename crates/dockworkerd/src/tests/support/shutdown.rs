//! Manually triggered shutdown signal.

use std::sync::{Arc, Condvar, Mutex};

use crate::process::{ShutdownError, ShutdownSignal};

/// Blocks until [`TestShutdownSignal::trigger`] is called from any clone.
#[derive(Clone, Default)]
pub struct TestShutdownSignal {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl TestShutdownSignal {
    pub fn trigger(&self) {
        let (flag, ready) = &*self.state;
        *flag.lock().expect("shutdown mutex poisoned") = true;
        ready.notify_all();
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let (flag, ready) = &*self.state;
        let mut triggered = flag.lock().expect("shutdown mutex poisoned");
        while !*triggered {
            triggered = ready.wait(triggered).expect("shutdown mutex poisoned");
        }
        Ok(())
    }
}
