//! Session token creation with a configured signing algorithm.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use grader_core::config::auth::AuthConfig;
use grader_core::error::AppError;

use super::claims::Claims;
use super::error::TokenError;

/// Creates signed session tokens.
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Algorithm written into every header.
    algorithm: Algorithm,
}

/// A freshly signed token together with the values the session store
/// needs to register it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialized token.
    pub token: String,
    /// Unique token id.
    pub jti: Uuid,
    /// Issued-at, truncated to whole seconds.
    pub issued_at: DateTime<Utc>,
    /// Expiry, truncated to whole seconds.
    pub expires_at: DateTime<Utc>,
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            algorithm: parse_algorithm(&config.jwt_algorithm)?,
        })
    }

    /// Signs a token for `principal_id` valid for `ttl` from `issued_at`.
    ///
    /// Every call draws a fresh `jti`, so two tokens issued to the same
    /// principal in the same second still differ.
    pub fn issue(
        &self,
        principal_id: i64,
        principal_name: &str,
        issued_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Result<IssuedToken, TokenError> {
        let iat = issued_at.timestamp();
        let exp = iat + ttl.num_seconds();

        let claims = Claims {
            uid: principal_id,
            name: principal_name.to_string(),
            jti: Uuid::new_v4(),
            iat,
            exp,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti: claims.jti,
            issued_at: timestamp(iat)?,
            expires_at: timestamp(exp)?,
        })
    }
}

impl fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Resolve a configured algorithm name.
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    Algorithm::from_str(name)
        .map_err(|e| AppError::configuration(format!("Unknown signing algorithm '{name}': {e}")))
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::Signing(format!("timestamp {secs} out of range")))
}
