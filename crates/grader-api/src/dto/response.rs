//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grader_auth::session::{LiveSession, SessionGrant};
use grader_entity::solution::Solution;
use grader_entity::task::Task;
use grader_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Name.
    pub name: String,
    /// Admin flag.
    pub is_admin: bool,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Signup/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// User info.
    pub user: UserResponse,
}

impl From<SessionGrant> for TokenResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            token: grant.token,
            expires_at: grant.expires_at,
            user: grant.user.into(),
        }
    }
}

/// One live session of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Token id.
    pub id: String,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether this is the token the request was made with.
    pub current: bool,
}

impl SessionResponse {
    /// Builds the entry, flagging the caller's own token.
    pub fn new(session: LiveSession, current_jti: &str) -> Self {
        let id = session.jti.to_string();
        Self {
            current: id == current_jti,
            id,
            expires_at: session.expires_at,
        }
    }
}

/// Task entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: i32,
    /// Title.
    pub name: String,
    /// Statement.
    pub description: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
        }
    }
}

/// Accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResponse {
    /// Solution ID.
    pub id: i64,
    /// Task ID.
    pub task_id: i32,
    /// Grading status.
    pub status: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl From<Solution> for SolutionResponse {
    fn from(solution: Solution) -> Self {
        Self {
            id: solution.id,
            task_id: solution.task_id,
            status: solution.status.to_string(),
            created_at: solution.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `"up"` or `"down"`.
    pub session_store: String,
    /// `"up"`, `"down"`, or `"memory"` when no database is configured.
    pub database: String,
}
