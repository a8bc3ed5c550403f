//! Cache error types
//!
//! This module defines error types for cache operations.

use std::time::Duration;
use thiserror::Error;

/// Cache error types
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache entry not found
    #[error("Cache entry not found")]
    NotFound,
    /// Entry exceeds the memory tier's item size limit
    #[error("Cache storage is full")]
    StorageFull,
    /// I/O error (disk tier)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Remote object store error (S3 tier)
    #[error("Remote store error: {0}")]
    Remote(String),
    /// Durable or remote operation exceeded its time budget
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl CacheError {
    /// True for the "not found" class of errors, which callers treat as a miss
    pub fn is_not_found(&self) -> bool {
        match self {
            CacheError::NotFound => true,
            CacheError::IoError(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
