//! # grader-api
//!
//! HTTP API layer for the grader built on Axum.
//!
//! Provides the auth, task, submission, and health endpoints, the bearer
//! token extractors that run the authentication gate, error mapping, and
//! server startup.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
