//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grader_core::error::{AppError, ErrorKind};
use grader_core::result::AppResult;
use grader_entity::user::{NewUser, User};

use crate::traits::PrincipalDirectory;

/// PostgreSQL-backed principal directory.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalDirectory for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, password_hash, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, password_hash, is_admin, created_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by name", e))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, password_hash, is_admin)
               VALUES ($1, $2, $3)
               RETURNING id, name, password_hash, is_admin, created_at"#,
        )
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::conflict(format!("User '{}' already exists", user.name));
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to create user", e)
        })
    }
}
