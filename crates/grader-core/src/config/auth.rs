//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Signing algorithms accepted for session tokens. Only the HMAC family
/// works with a shared secret.
const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Longest session token lifetime accepted, one week.
pub const MAX_SESSION_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Token signing and credential configuration.
///
/// Built once at startup and shared immutably; key rotation is not
/// supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Signing algorithm identifier.
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Session token TTL in minutes.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
    /// Clock-skew leeway applied when checking `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub token_leeway_seconds: u64,
    /// Minimum password length accepted at signup.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Rejects empty secrets, non-HMAC algorithms, and token lifetimes
    /// outside `1..=MAX_SESSION_TTL_MINUTES`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !SUPPORTED_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "Unsupported auth.jwt_algorithm '{}'. Supported: {}",
                self.jwt_algorithm,
                SUPPORTED_ALGORITHMS.join(", ")
            )));
        }
        if self.session_ttl_minutes == 0 || self.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.session_ttl_minutes must be between 1 and {MAX_SESSION_TTL_MINUTES}"
            )));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_algorithm(),
            session_ttl_minutes: default_session_ttl(),
            token_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_session_ttl() -> u64 {
    30
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    1
}
