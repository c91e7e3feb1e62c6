//! Redis connection management.

use std::sync::Arc;
use std::time::Duration;

use redis::Client;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;
use tracing::info;

use grader_core::config::cache::RedisCacheConfig;
use grader_core::error::{AppError, ErrorKind};
use grader_core::result::AppResult;

/// Redis client wrapper with connection management.
///
/// The connection manager reconnects on its own; `close` drops it so the
/// process stops talking to Redis during shutdown.
#[derive(Debug, Clone)]
pub struct RedisClient {
    /// Redis connection manager, `None` once closed.
    conn: Arc<RwLock<Option<ConnectionManager>>>,
    /// Key prefix for all keys.
    key_prefix: String,
}

impl RedisClient {
    /// Connect and verify the server answers a PING within the configured
    /// timeout.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        let mut conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| AppError::cache("Timed out connecting to Redis"))?
            .map_err(|e| {
                AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
            })?;

        let pong: String = tokio::time::timeout(timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| AppError::cache("Timed out pinging Redis"))?
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Failed to ping Redis", e))?;

        info!(reply = %pong, "Successfully connected to Redis");
        Ok(Self {
            conn: Arc::new(RwLock::new(Some(conn))),
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Get a clone of the connection manager, or fail if the client has
    /// been closed.
    pub async fn conn_mut(&self) -> AppResult<ConnectionManager> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::cache("Redis connection is closed"))
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Drop the connection manager. Idempotent.
    pub async fn close(&self) {
        if self.conn.write().await.take().is_some() {
            info!("Redis connection closed");
        }
    }
}

/// Mask password in Redis URL for safe logging.
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
