//! Invocation recording
//!
//! Timers don't buffer their callbacks' results. Callers that want to observe
//! when a callback ran and what it returned record into an `InvocationLog`
//! from inside the callback.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use crate::clock;

/// One observed callback invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation<R> {
    /// Milliseconds since the log was created
    pub time: u64,
    /// Value the callback produced
    pub returned: R,
}

/// Thread-safe, cloneable recorder of invocations.
///
/// All clones append to the same list and share the same start instant.
#[derive(Debug)]
pub struct InvocationLog<R> {
    start: Instant,
    entries: Arc<Mutex<Vec<Invocation<R>>>>,
}

impl<R> Clone for InvocationLog<R> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<R> Default for InvocationLog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InvocationLog<R> {
    /// Creates an empty log whose clock starts now.
    pub fn new() -> Self {
        Self {
            start: clock::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends `returned`, stamped with the elapsed time.
    pub fn record(&self, returned: R) {
        let time = clock::elapsed_ms(self.start);
        self.entries.lock().push(Invocation { time, returned });
    }

    /// Elapsed milliseconds of every recorded invocation, in order.
    pub fn times(&self) -> Vec<u64> {
        self.entries.lock().iter().map(|entry| entry.time).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<R: Clone> InvocationLog<R> {
    /// Snapshot of every recorded invocation.
    pub fn entries(&self) -> Vec<Invocation<R>> {
        self.entries.lock().clone()
    }

    /// Returned values, in invocation order.
    pub fn values(&self) -> Vec<R> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.returned.clone())
            .collect()
    }
}
