//! Task entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A problem in the catalog that users submit solutions for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Catalog identifier.
    pub id: i32,
    /// Short title.
    pub name: String,
    /// Full problem statement.
    pub description: String,
}

/// Data required to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Short title.
    pub name: String,
    /// Full problem statement.
    pub description: String,
}
