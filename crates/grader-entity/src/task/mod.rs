//! Task catalog entities.

pub mod model;

pub use model::{NewTask, Task};
