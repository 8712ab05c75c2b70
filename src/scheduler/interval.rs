//! Repeating Timer
//!
//! Runs a callback immediately and then on a fixed interval until cancelled.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clock;
use crate::error::panic_message;
use crate::scheduler::{CancelHandle, TimerState};

/// Shortest period a repeating timer will tick at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Invokes `f` now, then every `interval` until the handle is cancelled.
///
/// The first invocation happens synchronously, before this function returns.
/// Later ticks are measured from the registration instant (t, 2t, 3t, ...).
/// The period is clamped to [`MIN_INTERVAL`]..=[`clock::FAR_FUTURE`].
/// Cancellation suppresses every tick not yet started; an invocation already
/// running completes. If `f` panics on a later tick the timer stops and its
/// handle reports [`TimerState::Failed`].
///
/// # Panics
/// Panics if called outside a tokio runtime, or if the first synchronous
/// invocation of `f` panics.
pub fn schedule_repeating<F>(mut f: F, interval: Duration) -> CancelHandle
where
    F: FnMut() + Send + 'static,
{
    let period = interval.clamp(MIN_INTERVAL, clock::FAR_FUTURE);
    let start = clock::now();
    let handle = CancelHandle::new(TimerState::Active);

    handle.record_fire();
    f();

    let timer = handle.clone();
    tokio::spawn(async move {
        let mut ticks = interval_at(clock::deadline_after(start, period), period);
        // Stay on the original grid if a callback overruns a tick
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = timer.cancelled() => break,
                _ = ticks.tick() => {
                    if !timer.is_active() {
                        break;
                    }
                    timer.record_fire();
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(&mut f)) {
                        timer.fail();
                        warn!(
                            fires = timer.fire_count(),
                            message = %panic_message(payload.as_ref()),
                            "Repeating timer callback panicked"
                        );
                        break;
                    }
                }
            }
        }

        debug!(fires = timer.fire_count(), "Repeating timer stopped");
    });

    info!(?period, "Repeating timer started");
    handle
}
