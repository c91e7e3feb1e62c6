//! Per-principal session liveness records.
//!
//! Each principal owns one hash in the backend keyed by
//! `session:{principal_id}`. Fields are token ids, values are the token's
//! expiry as decimal unix seconds. A token is live exactly while its field
//! exists. Expired fields are not removed by the backend; they are swept
//! the next time the same principal logs in.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use grader_cache::keys;
use grader_core::config::session::SessionConfig;
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;

use crate::deadline::bounded;

/// A session record that has not yet expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSession {
    /// Token id.
    pub jti: Uuid,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// Tracks which issued tokens are still live.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Hash backend (Redis or in-memory).
    backend: Arc<dyn HashStore>,
    /// Upper bound for each backend call.
    timeout: Duration,
}

impl SessionStore {
    /// Creates a session store over `backend`.
    pub fn new(backend: Arc<dyn HashStore>, config: &SessionConfig) -> Self {
        Self {
            backend,
            timeout: config.operation_timeout(),
        }
    }

    /// Records `jti` as live for `principal_id` until `expires_at`.
    ///
    /// Before writing, every entry of this principal whose expiry has
    /// passed (or cannot be read) is deleted. Entries of other principals
    /// are never touched. Concurrent registrations for one principal may
    /// each sweep the same entries; that is harmless.
    pub async fn register(
        &self,
        principal_id: i64,
        jti: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let key = keys::user_sessions(principal_id);

        let existing = bounded(
            self.timeout,
            "session sweep read",
            self.backend.hash_get_all(&key),
        )
        .await?;

        let dead = dead_entries(&existing, Utc::now().timestamp());
        if !dead.is_empty() {
            let removed = bounded(
                self.timeout,
                "session sweep",
                self.backend.hash_delete(&key, &dead),
            )
            .await?;
            debug!(principal_id, removed, "Swept expired sessions");
        }

        bounded(
            self.timeout,
            "session register",
            self.backend
                .hash_set(&key, &jti.to_string(), &expires_at.timestamp().to_string()),
        )
        .await?;

        debug!(principal_id, %jti, expires_at = %expires_at, "Session registered");
        Ok(())
    }

    /// Whether `jti` is registered for `principal_id`.
    ///
    /// Fails closed: a backend error or timeout reports the session as not
    /// live.
    pub async fn is_live(&self, principal_id: i64, jti: Uuid) -> bool {
        let key = keys::user_sessions(principal_id);
        match bounded(
            self.timeout,
            "session lookup",
            self.backend.hash_exists(&key, &jti.to_string()),
        )
        .await
        {
            Ok(live) => live,
            Err(e) => {
                warn!(principal_id, %jti, error = %e, "Session lookup failed; treating as not live");
                false
            }
        }
    }

    /// Removes one session. Returns whether it existed.
    pub async fn revoke(&self, principal_id: i64, jti: Uuid) -> AppResult<bool> {
        let key = keys::user_sessions(principal_id);
        let removed = bounded(
            self.timeout,
            "session revoke",
            self.backend.hash_delete(&key, &[jti.to_string()]),
        )
        .await?;
        info!(principal_id, %jti, removed, "Session revoked");
        Ok(removed > 0)
    }

    /// Removes every session of `principal_id`.
    pub async fn revoke_all(&self, principal_id: i64) -> AppResult<()> {
        let key = keys::user_sessions(principal_id);
        bounded(self.timeout, "session revoke all", self.backend.delete(&key)).await?;
        info!(principal_id, "All sessions revoked");
        Ok(())
    }

    /// Lists the unexpired sessions of `principal_id`, soonest expiry first.
    pub async fn live_sessions(&self, principal_id: i64) -> AppResult<Vec<LiveSession>> {
        let key = keys::user_sessions(principal_id);
        let entries = bounded(
            self.timeout,
            "session list",
            self.backend.hash_get_all(&key),
        )
        .await?;

        let now = Utc::now().timestamp();
        let mut live: Vec<LiveSession> = entries
            .iter()
            .filter_map(|(field, value)| {
                let jti = Uuid::parse_str(field).ok()?;
                let exp = value.parse::<i64>().ok().filter(|exp| *exp > now)?;
                Some(LiveSession {
                    jti,
                    expires_at: DateTime::from_timestamp(exp, 0)?,
                })
            })
            .collect();
        live.sort_by_key(|s| s.expires_at);
        Ok(live)
    }

    /// Whether the backend answers.
    pub async fn health_check(&self) -> bool {
        bounded(self.timeout, "session health", self.backend.health_check())
            .await
            .unwrap_or(false)
    }

    /// Releases the backend connection. Later lookups fail closed.
    pub async fn close(&self) -> AppResult<()> {
        self.backend.close().await?;
        info!("Session store closed");
        Ok(())
    }
}

/// Fields whose expiry is at or before `now`, or is not an integer.
fn dead_entries(entries: &HashMap<String, String>, now: i64) -> Vec<String> {
    entries
        .iter()
        .filter(|(_, exp)| exp.parse::<i64>().map_or(true, |exp| exp <= now))
        .map(|(field, _)| field.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    use grader_cache::memory::MemoryHashStore;
    use grader_core::error::ErrorKind;

    use super::*;

    fn store() -> (SessionStore, Arc<MemoryHashStore>) {
        let backend = Arc::new(MemoryHashStore::new());
        let store = SessionStore::new(backend.clone(), &SessionConfig::default());
        (store, backend)
    }

    fn in_minutes(minutes: i64) -> DateTime<Utc> {
        Utc::now() + ChronoDuration::minutes(minutes)
    }

    /// Backend whose every call hangs forever.
    #[derive(Debug)]
    struct HangingStore;

    #[async_trait]
    impl HashStore for HangingStore {
        async fn hash_get_all(&self, _: &str) -> AppResult<HashMap<String, String>> {
            std::future::pending().await
        }
        async fn hash_set(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            std::future::pending().await
        }
        async fn hash_delete(&self, _: &str, _: &[String]) -> AppResult<u64> {
            std::future::pending().await
        }
        async fn hash_exists(&self, _: &str, _: &str) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn delete(&self, _: &str) -> AppResult<()> {
            std::future::pending().await
        }
        async fn health_check(&self) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn close(&self) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_registered_session_is_live() {
        let (store, _) = store();
        let jti = Uuid::new_v4();

        store.register(1, jti, in_minutes(30)).await.unwrap();

        assert!(store.is_live(1, jti).await);
        assert!(!store.is_live(1, Uuid::new_v4()).await);
        assert!(!store.is_live(2, jti).await);
    }

    #[tokio::test]
    async fn test_sessions_coexist() {
        let (store, _) = store();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.register(1, a, in_minutes(30)).await.unwrap();
        store.register(1, b, in_minutes(30)).await.unwrap();

        assert!(store.is_live(1, a).await);
        assert!(store.is_live(1, b).await);
        assert_eq!(store.live_sessions(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_register_sweeps_only_dead_entries_of_same_principal() {
        let (store, backend) = store();
        let stale = Uuid::new_v4();
        let other_stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        store.register(1, stale, in_minutes(-5)).await.unwrap();
        store.register(2, other_stale, in_minutes(-5)).await.unwrap();
        backend
            .hash_set("session:1", "junk", "not-a-number")
            .await
            .unwrap();
        assert!(store.is_live(1, stale).await);

        store.register(1, fresh, in_minutes(30)).await.unwrap();

        assert!(!store.is_live(1, stale).await);
        assert!(!backend.hash_exists("session:1", "junk").await.unwrap());
        assert!(store.is_live(1, fresh).await);
        assert!(store.is_live(2, other_stale).await);
    }

    #[tokio::test]
    async fn test_revoke_and_revoke_all() {
        let (store, _) = store();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.register(1, a, in_minutes(30)).await.unwrap();
        store.register(1, b, in_minutes(30)).await.unwrap();

        assert!(store.revoke(1, a).await.unwrap());
        assert!(!store.revoke(1, a).await.unwrap());
        assert!(!store.is_live(1, a).await);
        assert!(store.is_live(1, b).await);

        store.revoke_all(1).await.unwrap();
        assert!(!store.is_live(1, b).await);
    }

    #[tokio::test]
    async fn test_live_sessions_skips_expired() {
        let (store, _) = store();
        let soon = Uuid::new_v4();
        let later = Uuid::new_v4();
        store.register(1, later, in_minutes(60)).await.unwrap();
        store.register(1, soon, in_minutes(10)).await.unwrap();
        store
            .backend
            .hash_set("session:1", &Uuid::new_v4().to_string(), "1")
            .await
            .unwrap();

        let live = store.live_sessions(1).await.unwrap();
        let ids: Vec<Uuid> = live.iter().map(|s| s.jti).collect();
        assert_eq!(ids, vec![soon, later]);
    }

    #[tokio::test]
    async fn test_closed_backend_fails_closed() {
        let (store, _) = store();
        let jti = Uuid::new_v4();
        store.register(1, jti, in_minutes(30)).await.unwrap();

        store.close().await.unwrap();

        assert!(!store.is_live(1, jti).await);
        assert!(store.register(1, Uuid::new_v4(), in_minutes(30)).await.is_err());
        assert!(!store.health_check().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_backend_times_out() {
        let store = SessionStore::new(Arc::new(HangingStore), &SessionConfig::default());

        let err = store
            .register(1, Uuid::new_v4(), in_minutes(30))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(!store.is_live(1, Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_all_survive() {
        let (store, _) = store();
        let jtis: Vec<Uuid> = (0..16).map(|_| Uuid::new_v4()).collect();

        let mut handles = Vec::new();
        for jti in jtis.clone() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.register(7, jti, in_minutes(30)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for jti in jtis {
            assert!(store.is_live(7, jti).await);
        }
    }

    #[test]
    fn test_dead_entries() {
        let entries = HashMap::from([
            ("a".to_string(), "100".to_string()),
            ("b".to_string(), "200".to_string()),
            ("c".to_string(), "oops".to_string()),
        ]);
        let mut dead = dead_entries(&entries, 100);
        dead.sort();
        assert_eq!(dead, vec!["a".to_string(), "c".to_string()]);
    }
}
