//! In-memory principal directory.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_entity::user::{NewUser, User};

use crate::traits::PrincipalDirectory;

/// Principal directory held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryUserDirectory {
    users: Arc<DashMap<i64, User>>,
    /// Name → id, guards name uniqueness.
    names: Arc<DashMap<String, i64>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryUserDirectory {
    /// Create an empty directory. Ids start at 1.
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            names: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Remove a user, leaving any sessions it had dangling.
    pub fn remove(&self, id: i64) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.names.remove(&user.name);
        Some(user)
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let Some(id) = self.names.get(name).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        match self.names.entry(user.name.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "User '{}' already exists",
                user.name
            ))),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let created = User {
                    id,
                    name: user.name,
                    password_hash: user.password_hash,
                    is_admin: user.is_admin,
                    created_at: Utc::now(),
                };
                self.users.insert(id, created.clone());
                slot.insert(id);
                Ok(created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grader_core::error::ErrorKind;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let dir = MemoryUserDirectory::new();
        let ann = dir.create(new_user("ann")).await.unwrap();

        assert_eq!(ann.id, 1);
        assert_eq!(dir.find_by_name("ann").await.unwrap(), Some(ann.clone()));
        assert_eq!(dir.find_by_id(ann.id).await.unwrap(), Some(ann));
        assert!(dir.find_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let dir = MemoryUserDirectory::new();
        dir.create(new_user("ann")).await.unwrap();
        let err = dir.create(new_user("ann")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = MemoryUserDirectory::new();
        let ann = dir.create(new_user("ann")).await.unwrap();
        assert!(dir.remove(ann.id).is_some());
        assert!(dir.find_by_id(ann.id).await.unwrap().is_none());
        assert!(dir.find_by_name("ann").await.unwrap().is_none());
    }
}
