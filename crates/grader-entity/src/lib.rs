//! # grader-entity
//!
//! Domain entities shared by the persistence, auth, and HTTP layers.

pub mod solution;
pub mod task;
pub mod user;
