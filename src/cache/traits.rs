//! Cache trait definition
//!
//! This module defines the `ArtifactCache` trait that every backend satisfies.
//! The pipeline only sees this trait, so it never knows which tiers sit
//! behind it.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::CacheError;
use super::key::Fingerprint;
use super::stats::CacheStats;

/// Fingerprint -> artifact store (memory, memory+disk, memory+S3)
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    /// Look up an artifact
    /// Returns `Ok(None)` on a miss in every tier
    async fn try_get(&self, key: Fingerprint) -> Result<Option<Bytes>, CacheError>;

    /// Store an artifact
    /// Overwrites any existing artifact for the key
    async fn set(&self, key: Fingerprint, data: Bytes) -> Result<(), CacheError>;

    /// Get cache statistics
    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
