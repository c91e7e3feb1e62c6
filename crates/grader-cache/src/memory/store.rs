//! In-memory hash store built on dashmap.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;

/// In-memory hash store. Each key's map sits behind the dashmap shard
/// lock, which gives the same per-key serialisation Redis does.
#[derive(Debug, Clone, Default)]
pub struct MemoryHashStore {
    /// Key → field → value.
    hashes: Arc<DashMap<String, HashMap<String, String>>>,
    /// Set once `close` has been called.
    closed: Arc<AtomicBool>,
}

impl MemoryHashStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::cache("Memory store is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl HashStore for MemoryHashStore {
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        self.ensure_open()?;
        Ok(self
            .hashes
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        self.ensure_open()?;
        self.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_delete(&self, key: &str, fields: &[String]) -> AppResult<u64> {
        self.ensure_open()?;
        let mut removed = 0u64;
        {
            let Some(mut entry) = self.hashes.get_mut(key) else {
                return Ok(0);
            };
            for field in fields {
                if entry.remove(field).is_some() {
                    removed += 1;
                }
            }
        }
        // Redis drops a hash once its last field is gone.
        self.hashes.remove_if(key, |_, map| map.is_empty());
        debug!(key, removed, "Deleted hash fields");
        Ok(removed)
    }

    async fn hash_exists(&self, key: &str, field: &str) -> AppResult<bool> {
        self.ensure_open()?;
        Ok(self
            .hashes
            .get(key)
            .is_some_and(|entry| entry.contains_key(field)))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.ensure_open()?;
        self.hashes.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.closed.load(Ordering::Acquire))
    }

    async fn close(&self) -> AppResult<()> {
        self.closed.store(true, Ordering::Release);
        self.hashes.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_all() {
        let store = MemoryHashStore::new();
        store.hash_set("session:1", "a", "100").await.unwrap();
        store.hash_set("session:1", "b", "200").await.unwrap();

        let all = store.hash_get_all("session:1").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("a").map(String::as_str), Some("100"));
        assert!(store.hash_get_all("session:2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_fields_drops_empty_key() {
        let store = MemoryHashStore::new();
        store.hash_set("k", "a", "1").await.unwrap();

        let removed = store
            .hash_delete("k", &["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(!store.hash_exists("k", "a").await.unwrap());
        assert!(store.hashes.get("k").is_none());
    }

    #[tokio::test]
    async fn test_closed_store_rejects_operations() {
        let store = MemoryHashStore::new();
        store.hash_set("k", "a", "1").await.unwrap();
        store.close().await.unwrap();

        assert!(store.hash_exists("k", "a").await.is_err());
        assert!(!store.health_check().await.unwrap());
    }
}
