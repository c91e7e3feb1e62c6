//! Key builders for every entry the grader writes to the session backend.
//!
//! Keys are unprefixed here; the Redis client adds the configured
//! namespace.

/// Key of the hash holding `jti → expiry` for one principal.
pub fn user_sessions(principal_id: i64) -> String {
    format!("session:{principal_id}")
}
