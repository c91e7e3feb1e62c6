//! Cache manager that dispatches to the configured backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use grader_core::config::cache::CacheConfig;
use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;

/// Wraps the configured hash store backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner backend.
    inner: Arc<dyn HashStore>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn HashStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis session backend");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisHashStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory session backend");
                Arc::new(crate::memory::MemoryHashStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing backend (for testing).
    pub fn from_provider(provider: Arc<dyn HashStore>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl HashStore for CacheManager {
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        self.inner.hash_get_all(key).await
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        self.inner.hash_set(key, field, value).await
    }

    async fn hash_delete(&self, key: &str, fields: &[String]) -> AppResult<u64> {
        self.inner.hash_delete(key, fields).await
    }

    async fn hash_exists(&self, key: &str, field: &str) -> AppResult<bool> {
        self.inner.hash_exists(key, field).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn close(&self) -> AppResult<()> {
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = CacheConfig {
            provider: "memcached".to_string(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, grader_core::error::ErrorKind::Configuration);
    }

    #[cfg(feature = "memory")]
    #[tokio::test]
    async fn test_memory_provider_round_trip() {
        let config = CacheConfig {
            provider: "memory".to_string(),
            ..CacheConfig::default()
        };
        let cache = CacheManager::new(&config).await.unwrap();
        cache.hash_set("session:9", "jti", "1").await.unwrap();
        assert!(cache.hash_exists("session:9", "jti").await.unwrap());
    }
}
