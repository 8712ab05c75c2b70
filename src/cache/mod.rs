//! Cache Module
//!
//! Provides an in-memory key-value store with per-entry TTL and lazy eviction.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::ExpiringCache;
