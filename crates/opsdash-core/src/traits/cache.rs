//! Time-bounded key-value store trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for time-bounded key-value stores.
///
/// Values are serialized as strings (JSON). Used for short-lived state
/// such as pending one-time passwords; implementations may be in-memory
/// or backed by a persistent/distributed store.
#[async_trait]
pub trait TtlStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key from the store.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists in the store.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Get a typed value by deserializing from JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    async fn put_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.put(key, &json, ttl).await
    }
}
