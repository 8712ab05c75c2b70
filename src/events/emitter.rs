//! Event Emitter Module
//!
//! Named events with any number of listeners. Emitting an event calls every
//! listener in subscription order and collects what they return.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

type Listener<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

struct Registry<A, R> {
    events: Mutex<HashMap<String, Vec<(u64, Listener<A, R>)>>>,
    next_id: AtomicU64,
}

// == Event Emitter ==
/// Dispatches arguments of type `A` to listeners returning `R`.
///
/// Cloning yields another handle to the same set of listeners.
pub struct EventEmitter<A, R> {
    registry: Arc<Registry<A, R>>,
}

impl<A, R> EventEmitter<A, R> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                events: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    // == Subscribe ==
    /// Adds `listener` to the end of `event`'s listener list.
    ///
    /// The same closure logic may be subscribed several times; each
    /// subscription is independent and gets its own [`Subscription`].
    pub fn subscribe<F>(&self, event: impl Into<String>, listener: F) -> Subscription<A, R>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        let event = event.into();
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);

        let mut events = self.registry.events.lock();
        let listeners = events.entry(event.clone()).or_default();
        listeners.push((id, Arc::new(listener)));
        debug!(event = %event, id, listeners = listeners.len(), "Listener subscribed");
        drop(events);

        Subscription {
            registry: Arc::downgrade(&self.registry),
            event,
            id,
            active: AtomicBool::new(true),
        }
    }

    // == Emit ==
    /// Calls every listener of `event` with `args` and returns their results
    /// in subscription order.
    ///
    /// An event nobody subscribed to yields an empty vector. Listeners run
    /// without the registry lock held, so they may subscribe or unsubscribe;
    /// such changes apply from the next `emit`.
    pub fn emit(&self, event: &str, args: &A) -> Vec<R> {
        let listeners: Vec<Listener<A, R>> = match self.registry.events.lock().get(event) {
            Some(listeners) => listeners.iter().map(|(_, f)| Arc::clone(f)).collect(),
            None => return Vec::new(),
        };

        debug!(event, listeners = listeners.len(), "Emitting event");
        listeners.iter().map(|listener| listener(args)).collect()
    }

    /// Number of listeners currently subscribed to `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.events.lock().get(event).map_or(0, Vec::len)
    }
}

impl<A, R> Default for EventEmitter<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Clone for EventEmitter<A, R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

// == Subscription ==
/// Handle for removing one listener.
///
/// Dropping it leaves the listener subscribed. It does not keep the emitter
/// alive.
pub struct Subscription<A, R> {
    registry: Weak<Registry<A, R>>,
    event: String,
    id: u64,
    active: AtomicBool,
}

impl<A, R> Subscription<A, R> {
    /// Removes the listener. Returns `true` only for the call that removed it;
    /// repeated calls, or calls after the emitter is gone, are no-ops.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let mut events = registry.events.lock();
        let Some(listeners) = events.get_mut(&self.event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        let removed = listeners.len() < before;
        if listeners.is_empty() {
            events.remove(&self.event);
        }

        debug!(event = %self.event, id = self.id, removed, "Listener unsubscribed");
        removed
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}
