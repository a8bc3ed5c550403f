//! Mock disk backend for testing (in-memory HashMap storage)

use super::backend::DiskBackend;
use super::error::DiskCacheError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Mock backend that stores files in memory for testing
#[derive(Clone, Default)]
pub struct MockDiskBackend {
    files: Arc<RwLock<HashMap<PathBuf, Bytes>>>,
    directories: Arc<RwLock<Vec<PathBuf>>>,
    simulate_storage_full: Arc<RwLock<bool>>,
    simulate_permission_denied: Arc<RwLock<bool>>,
    io_delay: Arc<RwLock<Option<Duration>>>,
}

impl MockDiskBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable storage full simulation for writes
    pub fn set_storage_full(&self, enabled: bool) {
        *self.simulate_storage_full.write() = enabled;
    }

    /// Enable permission denied simulation for reads and writes
    pub fn set_permission_denied(&self, enabled: bool) {
        *self.simulate_permission_denied.write() = enabled;
    }

    /// Delay every operation, for timeout tests
    pub fn set_io_delay(&self, delay: Option<Duration>) {
        *self.io_delay.write() = delay;
    }

    /// Get number of stored files
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    /// Drop all files, simulating a wiped volume
    pub fn clear(&self) {
        self.files.write().clear();
        self.directories.write().clear();
    }

    async fn maybe_delay(&self) {
        let delay = *self.io_delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_permission(&self) -> Result<(), DiskCacheError> {
        if *self.simulate_permission_denied.read() {
            return Err(DiskCacheError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Simulated permission denied",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DiskBackend for MockDiskBackend {
    async fn read_file(&self, path: &Path) -> Result<Bytes, DiskCacheError> {
        self.maybe_delay().await;
        self.check_permission()?;

        self.files.read().get(path).cloned().ok_or_else(|| {
            DiskCacheError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "File not found",
            ))
        })
    }

    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> Result<(), DiskCacheError> {
        self.maybe_delay().await;
        if *self.simulate_storage_full.read() {
            return Err(DiskCacheError::StorageFull);
        }
        self.check_permission()?;

        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).await?;
        }

        self.files.write().insert(path.to_path_buf(), data);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), DiskCacheError> {
        self.check_permission()?;

        let mut dirs = self.directories.write();
        if !dirs.iter().any(|d| d == path) {
            dirs.push(path.to_path_buf());
        }
        Ok(())
    }
}
