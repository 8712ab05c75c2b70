//! Fail-Fast Task Aggregation
//!
//! Runs a list of task factories concurrently and collects their results in
//! submission order. The first failure observed in time settles the aggregate;
//! anything arriving afterwards is discarded.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::TaskError;

/// Outcome of one task as seen by the coordinator: the task's own result, or
/// the payload of a panic raised while polling it.
type TaskOutcome<T, E> = std::thread::Result<Result<T, E>>;

// == Invocation ==
/// Calls every task factory in submission order.
///
/// Returns the produced futures tagged with their index, plus the first
/// invocation panic if any factory panicked. Factories after a panicking one
/// are still invoked; their futures are simply never awaited.
fn invoke_all<F, Fut, T, E>(tasks: Vec<F>) -> (Vec<(usize, Fut)>, Option<TaskError<E>>)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut futures = Vec::with_capacity(tasks.len());
    let mut first_failure = None;

    for (index, task) in tasks.into_iter().enumerate() {
        match panic::catch_unwind(AssertUnwindSafe(task)) {
            Ok(future) => futures.push((index, future)),
            Err(payload) => {
                if first_failure.is_none() {
                    warn!(index, "Task panicked during invocation");
                    first_failure = Some(TaskError::from_panic(index, payload));
                } else {
                    debug!(index, "Discarding invocation panic after aggregate failed");
                }
            }
        }
    }

    (futures, first_failure)
}

// == Result Slots ==
/// Fixed-size, order-preserving result buffer.
struct ResultSlots<T> {
    slots: Vec<Option<T>>,
    filled: usize,
}

impl<T> ResultSlots<T> {
    fn new(total: usize) -> Self {
        Self {
            slots: (0..total).map(|_| None).collect(),
            filled: 0,
        }
    }

    fn fill(&mut self, index: usize, value: T) {
        if self.slots[index].replace(value).is_none() {
            self.filled += 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    fn into_results(self) -> Vec<T> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Folds one task outcome into the slots, or converts it into the aggregate
/// failure.
fn settle<T, E>(
    slots: &mut ResultSlots<T>,
    index: usize,
    outcome: TaskOutcome<T, E>,
) -> Result<(), TaskError<E>> {
    match outcome {
        Ok(Ok(value)) => {
            slots.fill(index, value);
            Ok(())
        }
        Ok(Err(error)) => Err(TaskError::Rejected { index, error }),
        Err(payload) => Err(TaskError::from_panic(index, payload)),
    }
}

// == Run All ==
/// Runs every task concurrently within the calling future.
///
/// All factories are invoked before any future is polled. Results come back
/// in submission order regardless of completion order. The first rejection or
/// panic in time becomes the aggregate error and the remaining futures are
/// dropped unpolled, so their outcomes can never be observed.
///
/// This needs no particular runtime; any executor that polls the returned
/// future drives all tasks.
///
/// # Example
/// ```
/// use timebox::tasks::run_all;
///
/// let tasks: Vec<_> = [3, 1, 2]
///     .into_iter()
///     .map(|n| move || async move { Ok::<_, String>(n * 2) })
///     .collect();
///
/// let results = tokio_test::block_on(run_all(tasks)).unwrap();
/// assert_eq!(results, vec![6, 2, 4]);
/// ```
pub async fn run_all<F, Fut, T, E>(tasks: Vec<F>) -> Result<Vec<T>, TaskError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let total = tasks.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let (futures, invocation_failure) = invoke_all(tasks);
    if let Some(error) = invocation_failure {
        return Err(error);
    }

    let mut pending: FuturesUnordered<_> = futures
        .into_iter()
        .map(|(index, future)| {
            AssertUnwindSafe(future)
                .catch_unwind()
                .map(move |outcome| (index, outcome))
        })
        .collect();

    let mut slots = ResultSlots::new(total);
    while let Some((index, outcome)) = pending.next().await {
        if let Err(error) = settle(&mut slots, index, outcome) {
            debug!(index, remaining = pending.len(), "Aggregate failed fast");
            return Err(error);
        }
    }

    debug!(total, "All tasks settled successfully");
    Ok(slots.into_results())
}

// == Spawn All ==
/// Runs every task on its own tokio task.
///
/// Same contract as [`run_all`], but tasks make progress independently of
/// the aggregate being polled and may run on different worker threads. A
/// single coordinator owns the result slots and the settlement decision;
/// workers report through a channel. Once the aggregate has settled the
/// channel is closed, so late outcomes are dropped on the floor. Workers are
/// not aborted: work already dispatched runs to completion.
///
/// Must be called from within a tokio runtime.
pub async fn spawn_all<F, Fut, T, E>(tasks: Vec<F>) -> Result<Vec<T>, TaskError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let total = tasks.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let (futures, invocation_failure) = invoke_all(tasks);
    if let Some(error) = invocation_failure {
        return Err(error);
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, TaskOutcome<T, E>)>();
    for (index, future) in futures {
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(future).catch_unwind().await;
            let failed = !matches!(outcome, Ok(Ok(_)));
            if tx.send((index, outcome)).is_err() && failed {
                warn!(index, "Discarding failure from task after aggregate settled");
            }
        });
    }
    // Only workers hold senders now, so recv() yields None once all are gone.
    drop(tx);

    let mut slots = ResultSlots::new(total);
    while !slots.is_complete() {
        let Some((index, outcome)) = rx.recv().await else {
            let index = slots.first_empty().unwrap_or_default();
            return Err(TaskError::Panicked {
                index,
                message: "task was dropped before settling".to_string(),
            });
        };
        if let Err(error) = settle(&mut slots, index, outcome) {
            debug!(index, "Aggregate failed fast");
            return Err(error);
        }
    }

    debug!(total, "All spawned tasks settled successfully");
    Ok(slots.into_results())
}
