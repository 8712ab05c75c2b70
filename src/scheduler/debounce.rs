//! Debounce Module
//!
//! Collapses bursts of calls into a single invocation that runs once the
//! burst has been quiet for a fixed wait.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::scheduler::{schedule, CancelHandle, TimerState};

struct DebounceInner<A> {
    f: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    pending: Mutex<Option<CancelHandle>>,
}

/// Debounced wrapper around a callback. Clones share the same pending call.
pub struct Debouncer<A> {
    inner: Arc<DebounceInner<A>>,
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Wraps `f` so that it only runs `wait` after the most recent call.
pub fn debounce<A, F>(f: F, wait: Duration) -> Debouncer<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debouncer {
        inner: Arc::new(DebounceInner {
            f: Arc::new(f),
            wait,
            pending: Mutex::new(None),
        }),
    }
}

impl<A: Send + 'static> Debouncer<A> {
    /// Restarts the wait; when it elapses the callback runs with `args`.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self.inner.pending.lock();
        if let Some(previous) = pending.take() {
            if previous.cancel() {
                trace!("Debounce reset pending call");
            }
        }

        let f = Arc::clone(&self.inner.f);
        *pending = Some(schedule(move || f(args), self.inner.wait));
    }

    /// Drops the pending call, if any. Returns `true` if one was cancelled.
    pub fn cancel(&self) -> bool {
        self.inner
            .pending
            .lock()
            .take()
            .is_some_and(|handle| handle.cancel())
    }

    /// True while a call is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(|handle| handle.state() == TimerState::Scheduled)
    }
}
