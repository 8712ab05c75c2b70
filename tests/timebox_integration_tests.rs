//! Integration Tests for the public API
//!
//! Exercises each component end to end through the crate root exports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use timebox::models::InvocationLog;
use timebox::{
    clock, run_all, schedule, schedule_repeating, spawn_all, EventEmitter, ExpiringCache,
    SharedCache, TaskError, TimerState,
};
use tokio::time::{advance, sleep};

// == Helper Functions ==

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

type Task = Box<dyn FnOnce() -> BoxFuture<'static, Result<&'static str, String>> + Send>;

fn settle_after(delay: u64, outcome: Result<&'static str, &'static str>) -> Task {
    Box::new(move || {
        async move {
            sleep(ms(delay)).await;
            outcome.map_err(str::to_string)
        }
        .boxed()
    })
}

// == Expiring Cache ==

#[tokio::test(start_paused = true)]
async fn test_cache_walkthrough() {
    let mut cache = ExpiringCache::new();

    assert!(!cache.set(1, 42, ms(1000)));
    assert_eq!(cache.get(&1), Some(42));
    assert_eq!(cache.count(), 1);

    advance(ms(1000)).await;

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cache_set_reports_prior_liveness() {
    let mut cache = ExpiringCache::new();

    assert!(!cache.set("a", 1, ms(50)));
    assert!(cache.set("a", 2, ms(50)));

    advance(ms(60)).await;
    assert!(!cache.set("a", 3, ms(50)), "Expired entry must not count as live");
}

#[tokio::test(start_paused = true)]
async fn test_cache_count_excludes_never_read_entries() {
    let mut cache = ExpiringCache::new();
    for key in 0..10 {
        cache.set(key, key * 10, ms(10 + key as u64 * 10));
    }

    advance(ms(55)).await;

    // keys 0..=4 expire at 10, 20, 30, 40, 50
    assert_eq!(cache.count(), 5);
    assert_eq!(cache.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_cache_negative_duration_is_already_expired() {
    let mut cache = ExpiringCache::new();

    assert!(!cache.set(1, 1, clock::millis(-5)));
    assert_eq!(cache.get(&1), None);
}

#[tokio::test]
async fn test_shared_cache_accepts_max_duration() {
    let cache = SharedCache::new();

    assert!(!cache.set("forever", 1, Duration::MAX).await);
    assert_eq!(cache.get(&"forever").await, Some(1));
    assert_eq!(cache.count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_cache_across_tasks() {
    let cache = SharedCache::new();

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.set(i, i * 2, Duration::from_secs(10)).await })
        })
        .collect();
    for writer in writers {
        assert!(!writer.await.unwrap());
    }

    assert_eq!(cache.count().await, 8);
    assert_eq!(cache.get(&3).await, Some(6));
}

// == Task Aggregation ==

#[tokio::test]
async fn test_run_all_empty_resolves_immediately() {
    let result = run_all(Vec::<Task>::new()).await;
    assert!(result.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_all_submission_order() {
    let tasks = vec![
        settle_after(100, Ok("a")),
        settle_after(10, Ok("b")),
        settle_after(50, Ok("c")),
    ];

    assert_eq!(run_all(tasks).await.unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_run_all_fails_with_first_rejection() {
    let tasks = vec![
        settle_after(10, Err("E1")),
        settle_after(1000, Ok("late")),
    ];

    let err = run_all(tasks).await.unwrap_err();
    assert!(matches!(err, TaskError::Rejected { index: 0, ref error } if error == "E1"));
}

#[tokio::test(start_paused = true)]
async fn test_run_all_temporal_not_index_order() {
    let tasks = vec![
        settle_after(40, Err("slow failure")),
        settle_after(20, Err("fast failure")),
    ];

    let err = run_all(tasks).await.unwrap_err();
    assert_eq!(err.index(), 1);
    assert_eq!(err.into_rejection().as_deref(), Some("fast failure"));
}

#[tokio::test(start_paused = true)]
async fn test_spawn_all_late_success_has_no_effect() {
    let late_runs = Arc::new(AtomicUsize::new(0));
    let counter = late_runs.clone();

    let tasks: Vec<Task> = vec![
        settle_after(10, Err("E1")),
        Box::new(move || {
            async move {
                sleep(ms(1000)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("late")
            }
            .boxed()
        }),
    ];

    let err = spawn_all(tasks).await.unwrap_err();
    assert_eq!(err.into_rejection().as_deref(), Some("E1"));

    sleep(ms(1100)).await;
    assert_eq!(late_runs.load(Ordering::SeqCst), 1);
}

// == Scheduler ==

#[tokio::test(start_paused = true)]
async fn test_schedule_cancelled_at_5ms_never_fires() {
    let log = InvocationLog::new();
    let recorder = log.clone();

    let cancel = schedule(move || recorder.record(10), ms(20));
    sleep(ms(5)).await;
    cancel.cancel();
    sleep(ms(50)).await;

    assert!(log.is_empty());
    assert_eq!(cancel.state(), TimerState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_cancelled_at_30ms_fired_once() {
    let log = InvocationLog::new();
    let recorder = log.clone();

    let cancel = schedule(move || recorder.record(10), ms(20));
    sleep(ms(30)).await;
    cancel.cancel();
    cancel.cancel();

    assert_eq!(log.values(), vec![10]);
    assert_eq!(cancel.state(), TimerState::Fired);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_max_delay_is_cancellable() {
    let log = InvocationLog::new();
    let recorder = log.clone();

    let cancel = schedule(move || recorder.record(()), Duration::MAX);
    sleep(ms(5)).await;

    assert!(cancel.cancel());
    assert!(log.is_empty());
    assert_eq!(cancel.state(), TimerState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_repeating_cancelled_at_65ms() {
    let log = InvocationLog::new();
    let recorder = log.clone();

    let cancel = schedule_repeating(move || recorder.record(()), ms(30));
    sleep(ms(65)).await;
    cancel.cancel();
    sleep(ms(100)).await;

    assert_eq!(log.times(), vec![0, 30, 60]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_idempotence_matches_single_cancel() {
    let once = InvocationLog::new();
    let twice = InvocationLog::new();
    let (r1, r2) = (once.clone(), twice.clone());

    let h1 = schedule_repeating(move || r1.record(()), ms(25));
    let h2 = schedule_repeating(move || r2.record(()), ms(25));
    sleep(ms(60)).await;

    h1.cancel();
    h2.cancel();
    h2.cancel();
    sleep(ms(100)).await;

    assert_eq!(once.times(), twice.times());
    assert_eq!(h1.state(), h2.state());
}

// == Event Emitter ==

#[test]
fn test_emitter_results_follow_subscription_order() {
    let emitter: EventEmitter<i32, String> = EventEmitter::new();
    assert!(emitter.emit("ping", &1).is_empty());

    let first = emitter.subscribe("ping", |n| format!("first {}", n));
    let _second = emitter.subscribe("ping", |n| format!("second {}", n));
    assert_eq!(emitter.emit("ping", &7), vec!["first 7", "second 7"]);

    assert!(first.unsubscribe());
    assert!(!first.unsubscribe());
    assert_eq!(emitter.emit("ping", &8), vec!["second 8"]);
}
