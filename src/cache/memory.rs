//! Memory cache implementation
//!
//! `MemoryCache` is a size- and age-bounded map backed by moka. It is both the
//! memory-only backend and the authoritative front tier of the disk and S3
//! backends.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use super::config::MemoryCacheConfig;
use super::error::CacheError;
use super::key::Fingerprint;
use super::stats::{CacheStats, CacheStatsTracker};
use super::traits::ArtifactCache;

/// MemoryCache wraps moka for the ArtifactCache trait
pub struct MemoryCache {
    cache: moka::future::Cache<Fingerprint, Bytes>,
    stats: Arc<CacheStatsTracker>,
    max_item_size_bytes: u64,
}

impl MemoryCache {
    /// Create a new MemoryCache from configuration
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self::with_tracker(config, Arc::new(CacheStatsTracker::new()))
    }

    /// Create a MemoryCache whose counters are shared with an enclosing tier
    pub(crate) fn with_tracker(config: &MemoryCacheConfig, stats: Arc<CacheStatsTracker>) -> Self {
        let stats_clone = stats.clone();

        let cache = moka::future::Cache::builder()
            .max_capacity(config.max_cache_size_bytes())
            .time_to_live(Duration::from_secs(config.default_ttl_seconds))
            .weigher(|_key, data: &Bytes| -> u32 {
                data.len().try_into().unwrap_or(u32::MAX)
            })
            .eviction_listener(move |_key, _value, cause| {
                use moka::notification::RemovalCause;
                // Explicit replacement is not an eviction
                if matches!(cause, RemovalCause::Size | RemovalCause::Expired) {
                    stats_clone.increment_evictions();
                }
            })
            .build();

        Self {
            cache,
            stats,
            max_item_size_bytes: config.max_item_size_bytes(),
        }
    }

    /// Get an artifact without touching hit/miss counters
    pub async fn get_entry(&self, key: Fingerprint) -> Option<Bytes> {
        self.cache.get(&key).await
    }

    /// Insert an artifact
    /// Returns false when the artifact exceeds max_item_size and was not admitted
    pub async fn insert_entry(&self, key: Fingerprint, data: Bytes) -> bool {
        if data.len() as u64 > self.max_item_size_bytes {
            tracing::debug!(
                key = %key,
                bytes = data.len(),
                max_item_size_bytes = self.max_item_size_bytes,
                "Artifact too large for memory tier"
            );
            return false;
        }
        self.cache.insert(key, data).await;
        true
    }

    /// Forces moka to process pending evictions, expirations, and invalidations
    pub async fn run_pending(&self) {
        self.cache.run_pending_tasks().await;
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        self.stats
            .snapshot(self.cache.weighted_size(), self.cache.entry_count())
    }
}

#[async_trait]
impl ArtifactCache for MemoryCache {
    async fn try_get(&self, key: Fingerprint) -> Result<Option<Bytes>, CacheError> {
        match self.get_entry(key).await {
            Some(data) => {
                self.stats.increment_hits();
                Ok(Some(data))
            }
            None => {
                self.stats.increment_misses();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: Fingerprint, data: Bytes) -> Result<(), CacheError> {
        if self.insert_entry(key, data).await {
            Ok(())
        } else {
            Err(CacheError::StorageFull)
        }
    }

    fn stats(&self) -> CacheStats {
        self.snapshot()
    }
}
