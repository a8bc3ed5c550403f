// Cache configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::s3::S3CacheConfig;

/// Which backend fronts the memory tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Memory only (volatile)
    #[default]
    Memory,
    /// Memory + local disk
    Disk,
    /// Memory + S3 object store
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackendKind,
    /// Upper bound for every disk/S3 call in milliseconds (default: 10000)
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
    #[serde(default)]
    pub memory: MemoryCacheConfig,
    #[serde(default)]
    pub disk: DiskCacheConfig,
    #[serde(default)]
    pub s3: S3CacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            io_timeout_ms: default_io_timeout_ms(),
            memory: MemoryCacheConfig::default(),
            disk: DiskCacheConfig::default(),
            s3: S3CacheConfig::default(),
        }
    }
}

fn default_io_timeout_ms() -> u64 {
    10_000 // 10 seconds
}

impl CacheConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    /// Validate the memory tier plus whichever durable tier is selected
    pub fn validate(&self) -> Result<(), String> {
        if self.io_timeout_ms == 0 {
            return Err("io_timeout_ms must be greater than 0".to_string());
        }
        self.memory.validate()?;
        match self.backend {
            CacheBackendKind::Memory => Ok(()),
            CacheBackendKind::Disk => self.disk.validate(),
            CacheBackendKind::S3 => self.s3.validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    #[serde(default = "default_max_item_size_mb")]
    pub max_item_size_mb: u64,
    #[serde(default = "default_max_cache_size_mb")]
    pub max_cache_size_mb: u64,
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_item_size_mb: default_max_item_size_mb(),
            max_cache_size_mb: default_max_cache_size_mb(),
            default_ttl_seconds: default_ttl_seconds(),
        }
    }
}

fn default_max_item_size_mb() -> u64 {
    10 // 10MB
}

fn default_max_cache_size_mb() -> u64 {
    1024 // 1GB
}

fn default_ttl_seconds() -> u64 {
    3600 // 1 hour
}

impl MemoryCacheConfig {
    /// Convert max_item_size_mb to bytes
    pub fn max_item_size_bytes(&self) -> u64 {
        self.max_item_size_mb * 1024 * 1024
    }

    /// Convert max_cache_size_mb to bytes
    pub fn max_cache_size_bytes(&self) -> u64 {
        self.max_cache_size_mb * 1024 * 1024
    }

    /// Validate memory cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_item_size_mb > self.max_cache_size_mb {
            return Err(format!(
                "max_item_size_mb ({}) cannot be greater than max_cache_size_mb ({})",
                self.max_item_size_mb, self.max_cache_size_mb
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskCacheConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for DiskCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    "/var/cache/rendition".to_string()
}

impl DiskCacheConfig {
    /// Validate disk cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_dir.is_empty() {
            return Err("cache_dir cannot be empty when the disk backend is selected".to_string());
        }
        Ok(())
    }
}
