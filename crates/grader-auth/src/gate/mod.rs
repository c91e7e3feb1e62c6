//! Request gates: who is calling, and may they do this.

pub mod authenticate;
pub mod authorize;

pub use authenticate::{Authenticated, AuthenticationGate, extract_bearer};
pub use authorize::{require_admin, with_admin};
