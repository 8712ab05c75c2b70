//! Cancellation Handle Module
//!
//! A `CancelHandle` is the caller's capability to stop a scheduled timer. It
//! holds no reference into the runtime's timer structures: the timer task and
//! the handle share only an atomic state word and a cancellation token.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

// == Timer State ==
/// Lifecycle of a scheduled timer.
///
/// One-shot timers move `Scheduled -> Fired | Cancelled`; repeating timers
/// move `Active -> Cancelled | Failed`. Every transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// One-shot timer waiting for its deadline
    Scheduled,
    /// Repeating timer still ticking
    Active,
    /// One-shot timer whose callback has run (or is running)
    Fired,
    /// Stopped by its handle before any further invocation
    Cancelled,
    /// Repeating timer stopped because its callback panicked
    Failed,
}

impl TimerState {
    const fn as_u8(self) -> u8 {
        match self {
            TimerState::Scheduled => 0,
            TimerState::Active => 1,
            TimerState::Fired => 2,
            TimerState::Cancelled => 3,
            TimerState::Failed => 4,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TimerState::Scheduled,
            1 => TimerState::Active,
            2 => TimerState::Fired,
            3 => TimerState::Cancelled,
            _ => TimerState::Failed,
        }
    }

    /// True once no further invocation can happen.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TimerState::Fired | TimerState::Cancelled | TimerState::Failed
        )
    }
}

#[derive(Debug)]
struct TimerShared {
    state: AtomicU8,
    token: CancellationToken,
    fires: AtomicU64,
}

// == Cancel Handle ==
/// Capability to cancel one scheduled timer.
///
/// Cloning yields another handle to the same timer. Dropping every handle
/// does not cancel the timer.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    shared: Arc<TimerShared>,
}

impl CancelHandle {
    pub(crate) fn new(initial: TimerState) -> Self {
        Self {
            shared: Arc::new(TimerShared {
                state: AtomicU8::new(initial.as_u8()),
                token: CancellationToken::new(),
                fires: AtomicU64::new(0),
            }),
        }
    }

    // == Cancel ==
    /// Prevents every future invocation of the timer's callback.
    ///
    /// Returns `true` only for the call that actually cancelled the timer.
    /// Cancelling a timer that already fired, or cancelling twice, is a
    /// no-op returning `false`. An invocation already running is not
    /// interrupted.
    pub fn cancel(&self) -> bool {
        let cancelled = self.transition(TimerState::Scheduled, TimerState::Cancelled)
            || self.transition(TimerState::Active, TimerState::Cancelled);

        if cancelled {
            self.shared.token.cancel();
            debug!(fires = self.fire_count(), "Timer cancelled");
        }
        cancelled
    }

    /// Current lifecycle state. A repeating timer whose callback panicked
    /// reports [`TimerState::Failed`].
    pub fn state(&self) -> TimerState {
        TimerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == TimerState::Cancelled
    }

    /// Number of times the callback has been invoked so far.
    pub fn fire_count(&self) -> u64 {
        self.shared.fires.load(Ordering::Acquire)
    }

    // == Timer-side API ==
    /// Claims the single firing of a one-shot timer. Exactly one of
    /// `try_fire` and `cancel` can succeed.
    pub(crate) fn try_fire(&self) -> bool {
        self.transition(TimerState::Scheduled, TimerState::Fired)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state() == TimerState::Active
    }

    /// Stops a repeating timer after its callback panicked.
    pub(crate) fn fail(&self) -> bool {
        self.transition(TimerState::Active, TimerState::Failed)
    }

    pub(crate) fn record_fire(&self) {
        self.shared.fires.fetch_add(1, Ordering::AcqRel);
    }

    /// Completes once the handle has been cancelled.
    pub(crate) async fn cancelled(&self) {
        self.shared.token.cancelled().await
    }

    fn transition(&self, from: TimerState, to: TimerState) -> bool {
        self.shared
            .state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
