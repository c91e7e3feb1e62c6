//! PostgreSQL repository implementations.

pub mod solution;
pub mod task;
pub mod user;

pub use solution::SolutionRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
