//! Events Module
//!
//! Synchronous publish/subscribe keyed by event name.

mod emitter;

pub use emitter::{EventEmitter, Subscription};
