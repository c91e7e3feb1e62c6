//! # grader-database
//!
//! Persistence collaborators of the auth core: the principal directory,
//! the task catalog, and the solution queue. Each is a trait with a
//! PostgreSQL implementation and an in-memory one.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use traits::{PrincipalDirectory, SolutionQueue, TaskCatalog};
