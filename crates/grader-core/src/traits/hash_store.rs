//! Keyed hash-map backend used for session liveness records.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for backends that hold a field → value map per key (a Redis hash,
/// or its in-memory equivalent).
///
/// Implementations serialise operations on a single key but make no
/// promise about multi-command atomicity. Keys are passed unprefixed; the
/// backend applies its own namespace.
#[async_trait]
pub trait HashStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return every field/value pair stored under `key`. A missing key
    /// yields an empty map.
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>>;

    /// Insert or overwrite a single field.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()>;

    /// Remove the given fields. Returns how many were actually removed.
    async fn hash_delete(&self, key: &str, fields: &[String]) -> AppResult<u64>;

    /// Check whether `field` exists under `key`.
    async fn hash_exists(&self, key: &str, field: &str) -> AppResult<bool>;

    /// Remove the whole key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Release the underlying connection. Later calls fail.
    async fn close(&self) -> AppResult<()>;
}
