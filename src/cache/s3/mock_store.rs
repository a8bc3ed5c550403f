//! In-memory object store for testing the S3 tier

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::store::ObjectStore;
use crate::cache::CacheError;

#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    delay: Arc<RwLock<Option<Duration>>>,
    get_calls: Arc<AtomicU64>,
    put_calls: Arc<AtomicU64>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    pub fn insert(&self, key: &str, data: Bytes) {
        self.objects.write().insert(key.to_string(), data);
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.read().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Remote("simulated AccessDenied".to_string()));
        }
        Ok(self.objects.read().get(key).cloned())
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), CacheError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Remote("simulated SlowDown".to_string()));
        }
        self.objects.write().insert(key.to_string(), data);
        Ok(())
    }
}
