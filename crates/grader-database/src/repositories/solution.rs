//! Solution queue repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use grader_core::error::{AppError, ErrorKind};
use grader_core::result::AppResult;
use grader_entity::solution::{NewSolution, Solution, SolutionStatus};

use crate::traits::SolutionQueue;

/// Row shape of the `solutions` table; status is stored as text.
#[derive(Debug, FromRow)]
struct SolutionRow {
    id: i64,
    task_id: i32,
    user_id: i64,
    payload: Vec<u8>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SolutionRow> for Solution {
    type Error = AppError;

    fn try_from(row: SolutionRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<SolutionStatus>()
            .map_err(AppError::database)?;
        Ok(Self {
            id: row.id,
            task_id: row.task_id,
            user_id: row.user_id,
            payload: row.payload,
            status,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed solution queue.
#[derive(Debug, Clone)]
pub struct SolutionRepository {
    pool: PgPool,
}

impl SolutionRepository {
    /// Create a new solution repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SolutionQueue for SolutionRepository {
    async fn enqueue(&self, solution: NewSolution) -> AppResult<Solution> {
        let row = sqlx::query_as::<_, SolutionRow>(
            r#"INSERT INTO solutions (task_id, user_id, payload, status)
               VALUES ($1, $2, $3, $4)
               RETURNING id, task_id, user_id, payload, status, created_at"#,
        )
        .bind(solution.task_id)
        .bind(solution.user_id)
        .bind(&solution.payload)
        .bind(SolutionStatus::New.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to enqueue solution", e))?;

        row.try_into()
    }
}
