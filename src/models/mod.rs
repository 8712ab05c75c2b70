//! Data models
//!
//! Invocation records used to observe timers, and the DTOs the demo runner
//! serializes.

pub mod invocation;
pub mod report;

// Re-export commonly used types
pub use invocation::{Invocation, InvocationLog};
pub use report::{CacheReport, DemoReport, EventsReport, TasksReport, TimerReport};
