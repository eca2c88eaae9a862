//! Blob store trait for opaque-key byte storage.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for durable blob storage addressed by an opaque key.
///
/// Keys are generated by the caller (see `opsdash-storage::keys`) and are
/// globally unique; the store never derives meaning from them. The trait is
/// defined here in `opsdash-core` and implemented in `opsdash-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Store bytes under the given key, overwriting any previous content.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the bytes stored under a key. Returns `NotFound` if absent.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the bytes stored under a key. Idempotent: deleting a missing
    /// key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key currently holds bytes.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
