//! Solution queue entities.

pub mod model;
pub mod status;

pub use model::{NewSolution, Solution};
pub use status::SolutionStatus;
