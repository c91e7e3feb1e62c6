//! # grader-cache
//!
//! Backends for the session liveness keyspace. Supports two modes:
//!
//! - **redis**: one Redis hash per principal using the [redis](https://crates.io/crates/redis) crate
//! - **memory**: in-process hashes on a [dashmap](https://crates.io/crates/dashmap), for tests and single-node dev runs
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
