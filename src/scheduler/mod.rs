//! Scheduler Module
//!
//! Cancellable timers on top of the tokio runtime.
//!
//! # Timers
//! - `schedule`: one-shot delayed call
//! - `schedule_repeating`: immediate call, then one per interval
//! - `debounce`: trailing-edge debounce built on `schedule`
//!
//! Every timer hands back a [`CancelHandle`].

mod debounce;
mod handle;
mod interval;
mod timeout;

pub use debounce::{debounce, Debouncer};
pub use handle::{CancelHandle, TimerState};
pub use interval::{schedule_repeating, MIN_INTERVAL};
pub use timeout::schedule;
