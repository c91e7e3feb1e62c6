//! In-memory collaborators for tests and single-node dev runs.

pub mod solutions;
pub mod tasks;
pub mod users;

pub use solutions::MemorySolutionQueue;
pub use tasks::MemoryTaskCatalog;
pub use users::MemoryUserDirectory;
