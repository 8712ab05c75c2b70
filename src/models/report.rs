//! Demo report DTOs
//!
//! Shapes the demo runner's JSON output.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::Invocation;
use crate::scheduler::TimerState;

/// Outcome of the expiring cache walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Return value of each `set`, in call order
    pub set_results: Vec<bool>,
    /// `get` while the entry was live
    pub get_live: Option<i64>,
    /// `count` while the entry was live
    pub count_live: usize,
    /// `get` after the TTL elapsed
    pub get_expired: Option<i64>,
    /// `count` after the TTL elapsed
    pub count_expired: usize,
    pub stats: CacheStats,
}

/// Outcome of the task aggregation walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct TasksReport {
    /// Results of the all-success run, in submission order
    pub results: Vec<u64>,
    /// Milliseconds the all-success run took
    pub elapsed_ms: u64,
    /// Error surfaced by the run with a failing task
    pub failure: Option<String>,
    /// Result of `add_two`
    pub sum: i64,
}

/// Outcome of one timer walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct TimerReport {
    pub invocations: Vec<Invocation<i64>>,
    pub final_state: Option<TimerState>,
}

/// Outcome of the event emitter walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct EventsReport {
    /// Results of each `emit`, in call order
    pub emissions: Vec<Vec<serde_json::Value>>,
    /// Listeners left once the walkthrough unsubscribed one
    pub remaining_listeners: usize,
}

/// Full demo output.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// RFC 3339 timestamp of report creation
    pub generated_at: String,
    pub cache: CacheReport,
    pub tasks: TasksReport,
    pub timeout: TimerReport,
    pub interval: TimerReport,
    pub debounce: TimerReport,
    pub events: EventsReport,
}

impl DemoReport {
    /// Assembles a report stamped with the current wall-clock time.
    pub fn new(
        cache: CacheReport,
        tasks: TasksReport,
        timeout: TimerReport,
        interval: TimerReport,
        debounce: TimerReport,
        events: EventsReport,
    ) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            cache,
            tasks,
            timeout,
            interval,
            debounce,
            events,
        }
    }
}
