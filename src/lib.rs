//! Timebox - time-aware async primitives
//!
//! Provides an expiring key-value cache with lazy eviction, a fail-fast
//! order-preserving task aggregator, cancellable one-shot and repeating
//! timers, and a named-event emitter.

pub mod cache;
pub mod clock;
pub mod config;
pub mod demo;
pub mod error;
pub mod events;
pub mod models;
pub mod scheduler;
pub mod tasks;

pub use cache::{ExpiringCache, SharedCache};
pub use config::Config;
pub use error::{CacheError, TaskError};
pub use events::{EventEmitter, Subscription};
pub use scheduler::{debounce, schedule, schedule_repeating, CancelHandle, TimerState};
pub use tasks::{run_all, spawn_all};
