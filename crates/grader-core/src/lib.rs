//! # grader-core
//!
//! Core crate for the grader service. Contains configuration schemas,
//! the unified error system, and the backend traits implemented by the
//! cache crate.
//!
//! This crate has **no** internal dependencies on other grader crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
