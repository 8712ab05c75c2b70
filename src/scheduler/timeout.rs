//! One-Shot Timer
//!
//! Runs a callback once after a delay unless cancelled first.

use std::time::Duration;

use tokio::time::sleep_until;
use tracing::debug;

use crate::clock;
use crate::scheduler::{CancelHandle, TimerState};

/// Schedules `f` to run once, `delay` after this call.
///
/// The deadline is fixed at registration time. If the returned handle is
/// cancelled before the deadline, `f` never runs; cancelling afterwards is a
/// harmless no-op. A zero delay fires as soon as the runtime gets to it, and
/// a delay too large to represent is capped at [`clock::FAR_FUTURE`].
///
/// # Panics
/// Panics if called outside a tokio runtime.
///
/// # Example
/// ```ignore
/// let handle = schedule(move || log.record(x * 5), Duration::from_millis(20));
/// // Later, before the deadline:
/// handle.cancel();
/// ```
pub fn schedule<F>(f: F, delay: Duration) -> CancelHandle
where
    F: FnOnce() + Send + 'static,
{
    let handle = CancelHandle::new(TimerState::Scheduled);
    let deadline = clock::deadline_after(clock::now(), delay);
    let timer = handle.clone();

    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = timer.cancelled() => {
                debug!("One-shot timer cancelled before its deadline");
            }
            _ = sleep_until(deadline) => {
                if timer.try_fire() {
                    timer.record_fire();
                    f();
                    debug!(?delay, "One-shot timer fired");
                }
            }
        }
    });

    handle
}
