//! Solution entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::SolutionStatus;

/// A submitted solution waiting for (or processed by) the grading worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Queue identifier.
    pub id: i64,
    /// Task the solution is for.
    pub task_id: i32,
    /// Submitting user.
    pub user_id: i64,
    /// Raw submitted source.
    #[serde(skip_serializing)]
    pub payload: Vec<u8>,
    /// Grading status.
    pub status: SolutionStatus,
    /// When the solution was enqueued.
    pub created_at: DateTime<Utc>,
}

/// Data required to enqueue a solution.
#[derive(Debug, Clone)]
pub struct NewSolution {
    /// Task the solution is for.
    pub task_id: i32,
    /// Submitting user.
    pub user_id: i64,
    /// Raw submitted source.
    pub payload: Vec<u8>,
}
