use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

/// TTL key/value cache sitting in front of the subscription store.
///
/// The interface is deliberately infallible: a backend that cannot serve a
/// read reports a miss and the estimator recomputes. Mockable for testing.
#[async_trait]
pub trait EstimateCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache backed by moka.
///
/// Each entry carries its own TTL and is evicted automatically once it
/// elapses.
pub struct MemoryCache {
    inner: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryTtl)
                .build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[async_trait]
impl EstimateCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.inner.insert(key.to_string(), Entry { value, ttl }).await;
    }
}

/// Cache that never hits. Stands in when caching is disabled or the backend
/// is unavailable; every estimate recomputes.
pub struct NoopCache;

#[async_trait]
impl EstimateCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) {}
}
