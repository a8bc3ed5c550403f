//! Memory + S3 artifact cache

use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::config::S3CacheConfig;
use super::store::{ObjectStore, S3ObjectStore};
use crate::cache::config::MemoryCacheConfig;
use crate::cache::memory::MemoryCache;
use crate::cache::stats::CacheStatsTracker;
use crate::cache::{ArtifactCache, CacheError, CacheStats, Fingerprint};

/// S3-backed cache with an authoritative memory tier in front
///
/// Objects live at `<prefix><shard>/<hex16>.bin`. Missing objects are
/// misses and any other read failure is returned. Uploads are best effort:
/// once the memory tier holds the artifact, a failed or timed out upload is
/// logged and swallowed. An artifact too large for memory whose upload fails
/// is reported as `StorageFull`.
pub struct S3Cache {
    memory: MemoryCache,
    store: Arc<dyn ObjectStore>,
    prefix: String,
    io_timeout: Duration,
    stats: Arc<CacheStatsTracker>,
}

impl S3Cache {
    pub async fn new(
        memory: &MemoryCacheConfig,
        s3: &S3CacheConfig,
        io_timeout: Duration,
    ) -> Result<Self, CacheError> {
        s3.validate().map_err(CacheError::ConfigurationError)?;
        let store = S3ObjectStore::connect(s3).await;
        Ok(Self::with_store(
            memory,
            s3.prefix.clone(),
            io_timeout,
            Arc::new(store),
        ))
    }

    /// Create an S3 cache over an explicit object store
    pub fn with_store(
        memory: &MemoryCacheConfig,
        prefix: String,
        io_timeout: Duration,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let stats = Arc::new(CacheStatsTracker::new());
        Self {
            memory: MemoryCache::with_tracker(memory, stats.clone()),
            store,
            prefix,
            io_timeout,
            stats,
        }
    }

    pub fn object_key(&self, key: Fingerprint) -> String {
        key.object_key(&self.prefix)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.io_timeout, fut)
            .await
            .unwrap_or(Err(CacheError::Timeout(self.io_timeout)))
    }
}

#[async_trait]
impl ArtifactCache for S3Cache {
    async fn try_get(&self, key: Fingerprint) -> Result<Option<Bytes>, CacheError> {
        if let Some(data) = self.memory.get_entry(key).await {
            self.stats.increment_hits();
            return Ok(Some(data));
        }

        let object_key = self.object_key(key);
        match self.bounded(self.store.get(&object_key)).await {
            Ok(Some(data)) => {
                self.memory.insert_entry(key, data.clone()).await;
                self.stats.increment_hits();
                self.stats.increment_promotions();
                tracing::debug!(key = %key, bytes = data.len(), "Promoted S3 hit into memory");
                Ok(Some(data))
            }
            Ok(None) => {
                self.stats.increment_misses();
                Ok(None)
            }
            Err(e) => {
                tracing::error!(key = %key, object_key = %object_key, error = %e, "S3 cache read failed");
                Err(e)
            }
        }
    }

    async fn set(&self, key: Fingerprint, data: Bytes) -> Result<(), CacheError> {
        let in_memory = self.memory.insert_entry(key, data.clone()).await;

        let object_key = self.object_key(key);
        match self.bounded(self.store.put(&object_key, data)).await {
            Ok(()) => {
                self.stats.increment_durable_writes();
                Ok(())
            }
            Err(e) if in_memory => {
                self.stats.increment_durable_write_failures();
                tracing::warn!(
                    key = %key,
                    object_key = %object_key,
                    error = %e,
                    "S3 upload failed; artifact kept in memory only"
                );
                Ok(())
            }
            Err(e) => {
                // Neither tier holds the artifact
                self.stats.increment_durable_write_failures();
                tracing::warn!(
                    key = %key,
                    object_key = %object_key,
                    error = %e,
                    "S3 upload failed for artifact too large for memory"
                );
                Err(CacheError::StorageFull)
            }
        }
    }

    fn stats(&self) -> CacheStats {
        self.memory.snapshot()
    }
}
