//! Small awaitable helpers.

use std::future::Future;
use std::ops::Add;
use std::time::Duration;

use crate::clock;

/// Suspends for `duration`, then resumes.
///
/// Returns the time actually spent asleep on the runtime clock, which is at
/// least `duration`.
pub async fn sleep(duration: Duration) -> Duration {
    let start = clock::now();
    tokio::time::sleep(duration).await;
    clock::now().saturating_duration_since(start)
}

/// Awaits both inputs concurrently and returns their sum.
pub async fn add_two<A, B, T>(a: A, b: B) -> T
where
    A: Future<Output = T>,
    B: Future<Output = T>,
    T: Add<Output = T>,
{
    let (x, y) = futures::join!(a, b);
    x + y
}
