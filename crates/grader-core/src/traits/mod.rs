//! Core traits defined in `grader-core` and implemented by other crates.

pub mod hash_store;

pub use hash_store::HashStore;
