//! Clock Module
//!
//! Time source shared by every component. Uses tokio's `Instant` so the clock
//! can be paused and advanced in tests.

use std::time::Duration;

use tokio::time::Instant;

/// Returns the current instant on the runtime clock.
///
/// Outside a tokio runtime this falls back to the system monotonic clock.
pub fn now() -> Instant {
    Instant::now()
}

/// Converts a signed millisecond count into a `Duration`.
///
/// Negative values are clamped to zero, meaning "already expired" for cache
/// entries and "as soon as possible" for timers.
pub fn millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

/// Span used in place of a deadline that cannot be represented.
///
/// Roughly 30 years, the same horizon tokio uses for its own far-future
/// instant.
pub const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Returns the instant `delay` after `start`.
///
/// Never panics: a sum that overflows `Instant` becomes `start + FAR_FUTURE`.
pub fn deadline_after(start: Instant, delay: Duration) -> Instant {
    start
        .checked_add(delay)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Milliseconds elapsed since `start`, saturating at zero.
pub fn elapsed_ms(start: Instant) -> u64 {
    now().saturating_duration_since(start).as_millis() as u64
}
