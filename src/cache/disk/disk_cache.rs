//! Memory + local disk artifact cache

use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::backend::DiskBackend;
use super::error::DiskCacheError;
use super::tokio_backend::TokioFsBackend;
use crate::cache::config::{DiskCacheConfig, MemoryCacheConfig};
use crate::cache::memory::MemoryCache;
use crate::cache::stats::CacheStatsTracker;
use crate::cache::{ArtifactCache, CacheError, CacheStats, Fingerprint};

/// Disk-backed cache with an authoritative memory tier in front
///
/// Reads check memory, then `<cache_dir>/<shard>/<hex16>.bin`, promoting disk
/// hits into memory. Writes go to memory first and then to disk; disk
/// failures are returned to the caller since they indicate a misconfigured
/// volume rather than a transient fault.
pub struct DiskCache {
    memory: MemoryCache,
    backend: Arc<dyn DiskBackend>,
    cache_dir: PathBuf,
    io_timeout: Duration,
    stats: Arc<CacheStatsTracker>,
}

impl DiskCache {
    /// Create a disk cache on the local filesystem, creating the cache root
    pub async fn new(
        memory: &MemoryCacheConfig,
        disk: &DiskCacheConfig,
        io_timeout: Duration,
    ) -> Result<Self, CacheError> {
        Self::with_backend(
            memory,
            PathBuf::from(&disk.cache_dir),
            io_timeout,
            Arc::new(TokioFsBackend::new()),
        )
        .await
    }

    /// Create a disk cache over an explicit filesystem backend
    pub async fn with_backend(
        memory: &MemoryCacheConfig,
        cache_dir: PathBuf,
        io_timeout: Duration,
        backend: Arc<dyn DiskBackend>,
    ) -> Result<Self, CacheError> {
        let stats = Arc::new(CacheStatsTracker::new());
        let cache = Self {
            memory: MemoryCache::with_tracker(memory, stats.clone()),
            backend,
            cache_dir,
            io_timeout,
            stats,
        };

        cache
            .bounded(cache.backend.create_dir_all(&cache.cache_dir))
            .await?;

        tracing::info!(
            cache_dir = %cache.cache_dir.display(),
            io_timeout_ms = cache.io_timeout.as_millis() as u64,
            "Disk cache initialized"
        );
        Ok(cache)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Durable location of an artifact
    pub fn path_for(&self, key: Fingerprint) -> PathBuf {
        key.disk_path(&self.cache_dir)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, DiskCacheError>>,
    {
        match tokio::time::timeout(self.io_timeout, fut).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout(self.io_timeout)),
        }
    }
}

#[async_trait]
impl ArtifactCache for DiskCache {
    async fn try_get(&self, key: Fingerprint) -> Result<Option<Bytes>, CacheError> {
        if let Some(data) = self.memory.get_entry(key).await {
            self.stats.increment_hits();
            return Ok(Some(data));
        }

        let path = self.path_for(key);
        match self.bounded(self.backend.read_file(&path)).await {
            Ok(data) => {
                self.memory.insert_entry(key, data.clone()).await;
                self.stats.increment_hits();
                self.stats.increment_promotions();
                tracing::debug!(key = %key, bytes = data.len(), "Promoted disk hit into memory");
                Ok(Some(data))
            }
            Err(e) if e.is_not_found() => {
                self.stats.increment_misses();
                Ok(None)
            }
            Err(e) => {
                tracing::error!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "Disk cache read failed"
                );
                Err(e)
            }
        }
    }

    async fn set(&self, key: Fingerprint, data: Bytes) -> Result<(), CacheError> {
        // Memory first, so the artifact is served even if the disk write is abandoned
        self.memory.insert_entry(key, data.clone()).await;

        let path = self.path_for(key);
        match self
            .bounded(self.backend.write_file_atomic(&path, data))
            .await
        {
            Ok(()) => {
                self.stats.increment_durable_writes();
                Ok(())
            }
            Err(e) => {
                self.stats.increment_durable_write_failures();
                tracing::error!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "Disk cache write failed"
                );
                Err(e)
            }
        }
    }

    fn stats(&self) -> CacheStats {
        self.memory.snapshot()
    }
}
