//! Redis hash operations.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use grader_core::error::{AppError, ErrorKind};
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;

use super::client::RedisClient;

/// Redis-backed hash store. Each key is a native Redis hash, so Redis
/// serialises every command on it.
#[derive(Debug, Clone)]
pub struct RedisHashStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisHashStore {
    /// Create a new Redis hash store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl HashStore for RedisHashStore {
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut().await?;
        let entries: HashMap<String, String> =
            conn.hgetall(&full_key).await.map_err(Self::map_err)?;
        Ok(entries)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut().await?;
        let _: i64 = conn
            .hset(&full_key, field, value)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn hash_delete(&self, key: &str, fields: &[String]) -> AppResult<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut().await?;
        let removed: i64 = conn
            .hdel(&full_key, fields.to_vec())
            .await
            .map_err(Self::map_err)?;
        debug!(key = %full_key, removed, "Deleted hash fields");
        Ok(removed.max(0) as u64)
    }

    async fn hash_exists(&self, key: &str, field: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut().await?;
        let exists: bool = conn
            .hexists(&full_key, field)
            .await
            .map_err(Self::map_err)?;
        Ok(exists)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut().await?;
        let _: i64 = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }

    async fn close(&self) -> AppResult<()> {
        self.client.close().await;
        Ok(())
    }
}
