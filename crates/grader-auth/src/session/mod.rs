//! Session liveness tracking and the login/signup/logout flows.

pub mod manager;
pub mod store;

pub use manager::{SessionGrant, SessionManager};
pub use store::{LiveSession, SessionStore};
