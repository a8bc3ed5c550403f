//! Backend trait for filesystem operations

use super::error::DiskCacheError;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Abstraction over filesystem operations so the disk tier can be exercised
/// against an in-memory backend in tests
#[async_trait]
pub trait DiskBackend: Send + Sync {
    /// Read entire file contents
    /// A missing file surfaces as an `Io` error of kind `NotFound`
    async fn read_file(&self, path: &Path) -> Result<Bytes, DiskCacheError>;

    /// Write file contents atomically (using temp file + rename)
    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> Result<(), DiskCacheError>;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<(), DiskCacheError>;
}
