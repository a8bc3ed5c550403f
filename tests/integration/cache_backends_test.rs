// Backends selected through configuration, exercised via the trait object

use super::test_harness::disk_cache_config;
use bytes::Bytes;
use rendition::cache::{build_cache, CacheBackendKind, CacheConfig, Fingerprint};
use tempfile::TempDir;

#[tokio::test]
async fn test_memory_backend_round_trip() {
    let cache = build_cache(&CacheConfig::default()).await.unwrap();
    let key = Fingerprint(0x0102_0304_0506_0708);

    assert!(cache.try_get(key).await.unwrap().is_none());
    cache.set(key, Bytes::from_static(b"jpeg")).await.unwrap();
    assert_eq!(
        cache.try_get(key).await.unwrap(),
        Some(Bytes::from_static(b"jpeg"))
    );

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.durable_writes, 0);
}

#[tokio::test]
async fn test_disk_backend_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = disk_cache_config(&dir);
    let key = Fingerprint(0xABCD_0000_0000_0001);

    {
        let cache = build_cache(&config).await.unwrap();
        cache.set(key, Bytes::from_static(b"rendered")).await.unwrap();
        assert_eq!(cache.stats().durable_writes, 1);
    }

    let on_disk = dir.path().join("ab").join("abcd000000000001.bin");
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"rendered");

    // Fresh instance: memory is cold, the disk hit is promoted
    let cache = build_cache(&config).await.unwrap();
    assert_eq!(
        cache.try_get(key).await.unwrap(),
        Some(Bytes::from_static(b"rendered"))
    );
    assert_eq!(
        cache.try_get(key).await.unwrap(),
        Some(Bytes::from_static(b"rendered"))
    );
    let stats = cache.stats();
    assert_eq!(stats.promotions, 1);
    assert_eq!(stats.hits, 2);
}

#[tokio::test]
async fn test_disk_backend_miss_for_unknown_key() {
    let dir = TempDir::new().unwrap();
    let cache = build_cache(&disk_cache_config(&dir)).await.unwrap();

    assert!(cache.try_get(Fingerprint(42)).await.unwrap().is_none());
    assert_eq!(cache.stats().misses, 1);
}

#[tokio::test]
async fn test_disk_backend_concurrent_writers() {
    let dir = TempDir::new().unwrap();
    let cache = build_cache(&disk_cache_config(&dir)).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16u64 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            // Pairs of tasks share a key
            let key = Fingerprint((i / 2) << 56);
            cache
                .set(key, Bytes::from(vec![(i / 2) as u8; 1024]))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for k in 0..8u64 {
        let data = cache.try_get(Fingerprint(k << 56)).await.unwrap().unwrap();
        assert_eq!(data, Bytes::from(vec![k as u8; 1024]));
    }
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected() {
    let mut config = CacheConfig::default();
    config.backend = CacheBackendKind::S3;
    assert!(build_cache(&config).await.is_err());

    config.backend = CacheBackendKind::Disk;
    config.disk.cache_dir = String::new();
    assert!(build_cache(&config).await.is_err());
}
