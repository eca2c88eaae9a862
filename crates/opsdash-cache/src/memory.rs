//! In-memory TTL store implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use opsdash_core::config::cache::CacheConfig;
use opsdash_core::result::AppResult;
use opsdash_core::traits::cache::TtlStore;

/// In-memory TTL store backed by moka.
///
/// moka applies the time-to-live at cache level, set at construction from
/// configuration. Callers whose entries need a tighter deadline than the
/// cache-wide TTL carry their own expiry inside the stored value (the OTP
/// service does this).
#[derive(Debug, Clone)]
pub struct MemoryTtlStore {
    /// The underlying moka cache.
    cache: Cache<String, String>,
}

impl MemoryTtlStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self { cache }
    }
}

#[async_trait]
impl TtlStore for MemoryTtlStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: &str, value: &str, _ttl: Duration) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        debug!(key, "Stored TTL entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(key))
    }
}
