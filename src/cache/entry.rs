//! Cache Entry Module
//!
//! Defines a single cache slot carrying an absolute expiration instant.

use std::time::Duration;

use tokio::time::Instant;

use crate::clock;

// == Cache Entry ==
/// A stored value and the instant at which it stops being live.
///
/// Liveness is only ever decided at access time; an entry sitting in the map
/// may already be dead.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    ///
    /// A TTL too large to represent is capped at [`clock::FAR_FUTURE`].
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: clock::deadline_after(now, ttl),
        }
    }

    // == Liveness ==
    /// An entry is live while `expires_at > now`.
    ///
    /// At the boundary (`expires_at == now`) the entry is already expired, so a
    /// zero TTL never produces a readable value.
    pub fn is_live_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }

    /// Checks liveness against the current clock.
    pub fn is_expired(&self) -> bool {
        !self.is_live_at(clock::now())
    }

    // == Time To Live ==
    /// Remaining lifetime, or zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(clock::now())
    }
}
