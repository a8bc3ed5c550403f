//! Cache statistics types
//!
//! - `CacheStats`: snapshot of hits, misses, evictions and durable-tier writes
//! - `CacheStatsTracker`: lock-free counters shared by every backend

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache statistics for monitoring and logging
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits (any tier)
    pub hits: u64,
    /// Number of cache misses (all tiers)
    pub misses: u64,
    /// Hits served by the durable tier and promoted into memory
    pub promotions: u64,
    /// Number of memory evictions (due to size/TTL)
    pub evictions: u64,
    /// Successful durable/remote writes
    pub durable_writes: u64,
    /// Failed durable/remote writes (propagated or swallowed)
    pub durable_write_failures: u64,
    /// Current memory tier size in bytes
    pub current_size_bytes: u64,
    /// Current number of items in the memory tier
    pub current_item_count: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total requests)
    /// Returns 0.0 if there are no requests
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Statistics tracker using atomics for thread safety
#[derive(Debug, Default)]
pub(crate) struct CacheStatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    promotions: AtomicU64,
    evictions: AtomicU64,
    durable_writes: AtomicU64,
    durable_write_failures: AtomicU64,
}

impl CacheStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_promotions(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_evictions(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_durable_writes(&self) {
        self.durable_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_durable_write_failures(&self) {
        self.durable_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics
    pub fn snapshot(&self, current_size_bytes: u64, current_item_count: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            durable_writes: self.durable_writes.load(Ordering::Relaxed),
            durable_write_failures: self.durable_write_failures.load(Ordering::Relaxed),
            current_size_bytes,
            current_item_count,
        }
    }
}
