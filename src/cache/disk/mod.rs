//! Disk-based artifact cache
//!
//! Artifacts live at `<cache_dir>/<shard>/<hex16>.bin`, where the shard is
//! the first two hex digits of the fingerprint. Filesystem access goes through
//! the `DiskBackend` trait:
//! - **tokio::fs backend** (all platforms): portable async file I/O
//! - **mock backend** (tests): in-memory files with fault injection

pub use self::backend::DiskBackend;
pub use self::disk_cache::DiskCache;
pub use self::error::DiskCacheError;
pub use self::tokio_backend::TokioFsBackend;

pub mod backend;
mod disk_cache;
mod error;
pub mod tokio_backend;

#[cfg(test)]
pub(crate) mod mock_backend;
