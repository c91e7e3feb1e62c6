//! Collaborator contracts consumed by the auth core and the HTTP layer.
//!
//! `Ok(None)` always means "no such record"; `Err` means the store itself
//! failed. Callers rely on that split to tell a rejection from an outage.

use async_trait::async_trait;

use grader_core::result::AppResult;
use grader_entity::solution::{NewSolution, Solution};
use grader_entity::task::{NewTask, Task};
use grader_entity::user::{NewUser, User};

/// Catalog of users, looked up during login and on every authenticated
/// request.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by exact name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Insert a user. Fails with `Conflict` if the name is taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Catalog of gradable tasks.
#[async_trait]
pub trait TaskCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// List every task, ordered by id.
    async fn list(&self) -> AppResult<Vec<Task>>;

    /// Find a task by id.
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Task>>;

    /// Insert a task.
    async fn create(&self, task: NewTask) -> AppResult<Task>;
}

/// Hand-off point to the external grading worker.
#[async_trait]
pub trait SolutionQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a solution with status `new`.
    async fn enqueue(&self, solution: NewSolution) -> AppResult<Solution>;
}
