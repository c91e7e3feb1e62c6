//! Task repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grader_core::error::{AppError, ErrorKind};
use grader_core::result::AppResult;
use grader_entity::task::{NewTask, Task};

use crate::traits::TaskCatalog;

/// PostgreSQL-backed task catalog.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskCatalog for TaskRepository {
    async fn list(&self) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, Task>("SELECT id, name, description FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tasks", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT id, name, description FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn create(&self, task: NewTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&task.name)
        .bind(&task.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }
}
