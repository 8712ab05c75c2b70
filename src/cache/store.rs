//! Cache Store Module
//!
//! Key-value store where every entry carries its own deadline. Expired
//! entries are evicted lazily, only when a `get`, `try_get` or `count` touches
//! them; there is no background sweeper.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::clock;
use crate::error::{CacheError, Result};

// == Expiring Cache ==
/// Key-value store with per-entry expiration.
#[derive(Debug)]
pub struct ExpiringCache<K, V> {
    /// Key-value storage, possibly holding dead entries
    entries: HashMap<K, CacheEntry<V>>,
    /// Usage counters
    stats: CacheStats,
}

impl<K, V> Default for ExpiringCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, overwriting any prior entry.
    ///
    /// Returns `true` if an entry for `key` existed and was still live at the
    /// moment of the call, evaluated before the overwrite.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry; zero stores an already expired entry
    pub fn set(&mut self, key: K, value: V, ttl: Duration) -> bool {
        let now = clock::now();
        let was_live = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.is_live_at(now));

        self.entries.insert(key, CacheEntry::new(value, ttl, now));
        was_live
    }

    // == Get ==
    /// Returns the value for `key` if present and live.
    ///
    /// `None` covers both a missing key and an expired one. An expired entry
    /// is removed as a side effect.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.try_get(key).ok()
    }

    // == Try Get ==
    /// Like [`get`](Self::get), but reports why no value was returned.
    pub fn try_get(&mut self, key: &K) -> Result<V> {
        let now = clock::now();

        match self.entries.get(key) {
            Some(entry) if entry.is_live_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Ok(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_miss();
                self.stats.record_expirations(1);
                debug!(?key, "Evicted expired entry on read");
                Err(CacheError::Expired(format!("{:?}", key)))
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(format!("{:?}", key)))
            }
        }
    }

    // == Count ==
    /// Evicts every expired entry and returns the number still live.
    pub fn count(&mut self) -> usize {
        let now = clock::now();
        let before = self.entries.len();

        self.entries.retain(|_, entry| entry.is_live_at(now));

        let live = self.entries.len();
        let evicted = before - live;
        if evicted > 0 {
            self.stats.record_expirations(evicted);
            debug!("Count sweep evicted {} expired entries", evicted);
        }
        live
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters.
    ///
    /// `live_entries` is computed against the current clock but, unlike
    /// [`count`](Self::count), evicts nothing.
    pub fn stats(&self) -> CacheStats {
        let now = clock::now();
        let mut stats = self.stats.clone();
        stats.set_live_entries(
            self.entries
                .values()
                .filter(|entry| entry.is_live_at(now))
                .count(),
        );
        stats
    }

    // == Length ==
    /// Raw number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use tokio::time::advance;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_store_new() {
        let store: ExpiringCache<i32, i32> = ExpiringCache::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = ExpiringCache::new();

        assert!(!store.set(1, 42, ms(1000)));
        assert_eq!(store.get(&1), Some(42));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: ExpiringCache<i32, i32> = ExpiringCache::new();

        assert_eq!(store.get(&7), None);
        assert!(matches!(store.try_get(&7), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_overwrite_live_returns_true() {
        let mut store = ExpiringCache::new();

        assert!(!store.set("k", "v1", ms(1000)));
        assert!(store.set("k", "v2", ms(1000)));

        assert_eq!(store.get(&"k"), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_real_time_expiration() {
        let mut store = ExpiringCache::new();

        store.set(1, 42, ms(50));
        assert_eq!(store.get(&1), Some(42));

        sleep(ms(80));

        assert_eq!(store.get(&1), None);
        assert!(store.is_empty(), "Expired entry should be evicted by get");
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_try_get_reports_expired() {
        let mut store = ExpiringCache::new();
        store.set("k", 1, ms(100));

        advance(ms(100)).await;

        assert!(matches!(store.try_get(&"k"), Err(CacheError::Expired(_))));
        // Already evicted, so the second lookup is a plain miss
        assert!(matches!(store.try_get(&"k"), Err(CacheError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_set_over_expired_returns_false() {
        let mut store = ExpiringCache::new();
        store.set(1, 42, ms(50));

        advance(ms(60)).await;

        // The stale entry is still in the map but no longer counts as live
        assert_eq!(store.len(), 1);
        assert!(!store.set(1, 50, ms(100)));
        assert_eq!(store.get(&1), Some(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_count_sweeps_untouched_entries() {
        let mut store = ExpiringCache::new();
        store.set(1, 42, ms(100));
        store.set(2, 43, ms(300));
        store.set(3, 44, ms(50));

        advance(ms(150)).await;

        // Nothing has been read, so dead entries are still held
        assert_eq!(store.len(), 3);
        assert_eq!(store.count(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&2), Some(43));
    }

    #[test]
    fn test_store_zero_ttl_never_readable() {
        let mut store = ExpiringCache::new();

        assert!(!store.set(1, 42, Duration::ZERO));
        assert_eq!(store.get(&1), None);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_unbounded_ttl_stays_live() {
        let mut store = ExpiringCache::new();

        assert!(!store.set(1, 42, Duration::MAX));
        assert!(store.set(1, 43, Duration::MAX));

        advance(Duration::from_secs(86400 * 365)).await;
        assert_eq!(store.get(&1), Some(43));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_store_negative_millis_clamped() {
        let mut store = ExpiringCache::new();

        store.set(1, 42, clock::millis(-100));
        assert_eq!(store.get(&1), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_stats() {
        let mut store = ExpiringCache::new();
        store.set("a", 1, ms(100));
        store.set("b", 2, ms(10));

        assert_eq!(store.get(&"a"), Some(1)); // hit
        assert_eq!(store.get(&"zzz"), None); // miss

        advance(ms(20)).await;
        assert_eq!(store.get(&"b"), None); // miss + expiration

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.live_entries, 1);
    }
}
