//! Shared Cache Module
//!
//! Thread-safe handle around [`ExpiringCache`] for use from concurrent tasks.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, ExpiringCache};

/// Cloneable, lock-protected expiring cache.
///
/// `get` and `count` may evict, so every operation except `stats` takes the
/// write lock for its whole read-evict-write sequence.
#[derive(Debug)]
pub struct SharedCache<K, V> {
    inner: Arc<RwLock<ExpiringCache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedCache<K, V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ExpiringCache::default())),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: ExpiringCache<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// See [`ExpiringCache::set`].
    pub async fn set(&self, key: K, value: V, ttl: Duration) -> bool {
        self.inner.write().await.set(key, value, ttl)
    }

    /// See [`ExpiringCache::get`].
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.write().await.get(key)
    }

    /// See [`ExpiringCache::count`].
    pub async fn count(&self) -> usize {
        self.inner.write().await.count()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}
