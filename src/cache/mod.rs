//! Artifact cache module
//!
//! Rendered derivatives are stored under a [`Fingerprint`] in one of three
//! backends, all behind the [`ArtifactCache`] trait:
//!
//! - `memory`: moka-backed, size and TTL bounded, lost on restart
//! - `disk`: memory in front of `<cache_dir>/<shard>/<hex16>.bin`
//! - `s3`: memory in front of `<prefix><shard>/<hex16>.bin` objects
//!
//! The memory tier is authoritative for reads in every backend; durable
//! hits are promoted into it.

use std::sync::Arc;

pub mod config;
pub mod disk;
pub mod error;
pub mod key;
pub mod memory;
pub mod s3;
pub mod stats;
pub mod traits;

pub use config::{CacheBackendKind, CacheConfig, DiskCacheConfig, MemoryCacheConfig};
pub use disk::DiskCache;
pub use error::CacheError;
pub use key::Fingerprint;
pub use memory::MemoryCache;
pub use s3::{S3Cache, S3CacheConfig};
pub use stats::CacheStats;
pub use traits::ArtifactCache;

/// Build the configured backend
pub async fn build_cache(config: &CacheConfig) -> Result<Arc<dyn ArtifactCache>, CacheError> {
    config
        .validate()
        .map_err(CacheError::ConfigurationError)?;

    let cache: Arc<dyn ArtifactCache> = match config.backend {
        CacheBackendKind::Memory => Arc::new(MemoryCache::new(&config.memory)),
        CacheBackendKind::Disk => Arc::new(
            DiskCache::new(&config.memory, &config.disk, config.io_timeout()).await?,
        ),
        CacheBackendKind::S3 => {
            Arc::new(S3Cache::new(&config.memory, &config.s3, config.io_timeout()).await?)
        }
    };

    tracing::info!(
        backend = ?config.backend,
        max_cache_size_mb = config.memory.max_cache_size_mb,
        "Artifact cache ready"
    );
    Ok(cache)
}
