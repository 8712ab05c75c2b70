//! Demo Runner
//!
//! Drives each component through a short scripted scenario and collects what
//! was observed into a [`DemoReport`].

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::info;

use crate::cache::SharedCache;
use crate::clock;
use crate::config::Config;
use crate::events::EventEmitter;
use crate::models::{
    CacheReport, DemoReport, EventsReport, InvocationLog, TasksReport, TimerReport,
};
use crate::scheduler::{debounce, schedule, schedule_repeating};
use crate::tasks::{add_two, run_all, spawn_all};

/// Time left after the last expected event before a scenario is read back.
const SETTLE_MARGIN: Duration = Duration::from_millis(15);

type DemoTask = Box<dyn FnOnce() -> BoxFuture<'static, std::result::Result<u64, String>> + Send>;

fn resolve_after(ms: u64, value: u64) -> DemoTask {
    Box::new(move || {
        async move {
            sleep(Duration::from_millis(ms)).await;
            Ok::<u64, String>(value)
        }
        .boxed()
    })
}

fn reject_after(ms: u64, error: &'static str) -> DemoTask {
    Box::new(move || {
        async move {
            sleep(Duration::from_millis(ms)).await;
            Err::<u64, String>(error.to_string())
        }
        .boxed()
    })
}

// == Cache ==
/// Store, read, count, overwrite, then wait out the TTL and read again.
pub async fn run_cache(config: &Config) -> CacheReport {
    let cache = SharedCache::new();
    let ttl = config.cache_ttl();

    let mut set_results = vec![cache.set(1, 42, ttl).await];
    let get_live = cache.get(&1).await;
    let count_live = cache.count().await;
    set_results.push(cache.set(1, 50, ttl).await);

    sleep(ttl).await;

    let get_expired = cache.get(&1).await;
    let count_expired = cache.count().await;
    let stats = cache.stats().await;

    info!(?set_results, ?get_live, ?get_expired, "Cache walkthrough finished");
    CacheReport {
        set_results,
        get_live,
        count_live,
        get_expired,
        count_expired,
        stats,
    }
}

// == Tasks ==
/// Aggregates out-of-order completions, then a run with an early rejection.
pub async fn run_tasks() -> Result<TasksReport> {
    let start = clock::now();
    let results = run_all(vec![
        resolve_after(100, 1),
        resolve_after(10, 2),
        resolve_after(50, 3),
    ])
    .await
    .context("all-success aggregate should not fail")?;
    let elapsed_ms = clock::elapsed_ms(start);

    let failure = spawn_all(vec![reject_after(10, "E1"), resolve_after(1000, 4)])
        .await
        .err()
        .map(|err| err.to_string());

    let sum = add_two(future::ready(5), future::ready(7)).await;

    info!(?results, elapsed_ms, ?failure, "Task walkthrough finished");
    Ok(TasksReport {
        results,
        elapsed_ms,
        failure,
        sum,
    })
}

// == Timers ==
/// One-shot `x * 5` with x = 2, cancelled at `timeout_cancel`.
pub async fn run_timeout(config: &Config) -> TimerReport {
    let log = InvocationLog::new();
    let recorder = log.clone();
    let x: i64 = 2;

    let handle = schedule(move || recorder.record(x * 5), config.timeout_delay());
    sleep(config.timeout_cancel()).await;
    handle.cancel();

    let total = config.timeout_delay().max(config.timeout_cancel());
    sleep(total.saturating_sub(config.timeout_cancel()) + SETTLE_MARGIN).await;

    TimerReport {
        invocations: log.entries(),
        final_state: Some(handle.state()),
    }
}

/// Repeating `x * 2` with x = 4, cancelled at `interval_cancel`.
pub async fn run_interval(config: &Config) -> TimerReport {
    let log = InvocationLog::new();
    let recorder = log.clone();
    let x: i64 = 4;

    let handle = schedule_repeating(move || recorder.record(x * 2), config.interval());
    sleep(config.interval_cancel()).await;
    handle.cancel();
    sleep(SETTLE_MARGIN).await;

    TimerReport {
        invocations: log.entries(),
        final_state: Some(handle.state()),
    }
}

/// Two calls 25ms apart collapse into one invocation with the latest value.
pub async fn run_debounce(config: &Config) -> TimerReport {
    let log = InvocationLog::new();
    let recorder = log.clone();
    let dlog = debounce(move |x: i64| recorder.record(x), config.debounce());

    sleep(Duration::from_millis(50)).await;
    dlog.call(1);
    sleep(Duration::from_millis(25)).await;
    dlog.call(2);
    sleep(config.debounce() + SETTLE_MARGIN).await;

    TimerReport {
        invocations: log.entries(),
        final_state: None,
    }
}

// == Events ==
/// Emits before, between and after two subscriptions, dropping the first.
pub fn run_events() -> EventsReport {
    let emitter: EventEmitter<Vec<i64>, Value> = EventEmitter::new();
    let mut emissions = vec![emitter.emit("firstEvent", &Vec::new())];

    let joined = emitter.subscribe("firstEvent", |args: &Vec<i64>| {
        let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
        json!(parts.join(","))
    });
    emissions.push(emitter.emit("firstEvent", &vec![1, 2, 3]));

    let _incremented = emitter.subscribe("firstEvent", |args: &Vec<i64>| {
        json!(args.iter().map(|x| x + 1).collect::<Vec<_>>())
    });
    emissions.push(emitter.emit("firstEvent", &vec![4, 5, 6]));

    joined.unsubscribe();
    emissions.push(emitter.emit("firstEvent", &vec![7, 8, 9]));

    let remaining_listeners = emitter.listener_count("firstEvent");
    info!(emits = emissions.len(), remaining_listeners, "Event walkthrough finished");
    EventsReport {
        emissions,
        remaining_listeners,
    }
}

/// Runs every walkthrough in sequence.
pub async fn run(config: &Config) -> Result<DemoReport> {
    let cache = run_cache(config).await;
    let tasks = run_tasks().await?;
    let timeout = run_timeout(config).await;
    let interval = run_interval(config).await;
    let debounce = run_debounce(config).await;
    let events = run_events();

    Ok(DemoReport::new(cache, tasks, timeout, interval, debounce, events))
}
