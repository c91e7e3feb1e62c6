//! Reasons a token can be refused.

use thiserror::Error;

use grader_core::error::AppError;

/// Message shown to callers for every refused credential. Finer reasons
/// stay in the logs.
pub const REJECTED_CREDENTIAL: &str = "Invalid or expired credentials";

/// Typed outcome of a failed issue or parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a well-formed token, or its claims do not deserialize.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The signature does not match the claims.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The header names an algorithm other than the configured one.
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    /// The `exp` claim has passed.
    #[error("token has expired")]
    Expired,
    /// The token could not be produced.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::internal(err.to_string()),
            _ => AppError::authentication(REJECTED_CREDENTIAL),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::UnsupportedAlgorithm,
            _ => Self::Malformed(err.to_string()),
        }
    }
}
