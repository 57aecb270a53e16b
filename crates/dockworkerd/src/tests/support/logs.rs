//! `tracing` layer counting the worker's own log records per level.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts events whose target belongs to this crate.
#[derive(Debug, Clone, Default)]
pub struct LogCounter {
    counts: Arc<Mutex<HashMap<Level, usize>>>,
}

impl LogCounter {
    /// Runs `action` with this counter as the thread's subscriber.
    pub fn capture<T>(&self, action: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, action)
    }

    pub fn count(&self, level: Level) -> usize {
        self.counts
            .lock()
            .expect("log counter mutex poisoned")
            .get(&level)
            .copied()
            .unwrap_or(0)
    }
}

impl<S: Subscriber> Layer<S> for LogCounter {
    fn on_event(&self, event: &Event<'_>, _context: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(env!("CARGO_PKG_NAME")) {
            return;
        }
        *self
            .counts
            .lock()
            .expect("log counter mutex poisoned")
            .entry(*metadata.level())
            .or_default() += 1;
    }
}
