//! Tasks Module
//!
//! Concurrent task aggregation with fail-fast, order-preserving semantics,
//! plus a couple of small awaitable helpers.
//!
//! # Entry Points
//! - `run_all`: drives every task inside the calling future
//! - `spawn_all`: runs every task on its own tokio task
//! - `sleep` / `add_two`: single-shot await helpers

mod aggregate;
mod util;

pub use aggregate::{run_all, spawn_all};
pub use util::{add_two, sleep};
