//! # grader-auth
//!
//! Hybrid token/session authentication for the grader service.
//!
//! ## Modules
//!
//! - `jwt`: signed, time-bounded session tokens (issue and parse)
//! - `session`: per-user liveness records with lazy expiry sweep, and the
//!   signup/login/logout flows that feed them
//! - `password`: Argon2id password hashing
//! - `gate`: the per-request authentication pipeline and the admin check
//! - `deadline`: the timeout wrapper for every call that leaves the process

pub mod deadline;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod session;

pub use deadline::bounded;
pub use gate::{Authenticated, AuthenticationGate};
pub use jwt::{Claims, TokenDecoder, TokenEncoder, TokenError};
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionStore};
