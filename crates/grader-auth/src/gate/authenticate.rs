//! Per-request authentication pipeline.
//!
//! Extract, parse, check liveness, resolve the principal. Each step runs
//! only if the one before it passed, and nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use grader_core::config::session::SessionConfig;
use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_database::traits::PrincipalDirectory;
use grader_entity::user::User;

use crate::deadline::bounded;
use crate::jwt::error::REJECTED_CREDENTIAL;
use crate::jwt::{Claims, TokenDecoder};
use crate::session::SessionStore;

/// A resolved caller.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The principal, freshly read from the directory.
    pub principal: User,
    /// Claims of the presented token.
    pub claims: Claims,
}

/// Turns a presented token into a resolved principal.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct AuthenticationGate {
    decoder: Arc<TokenDecoder>,
    sessions: Arc<SessionStore>,
    directory: Arc<dyn PrincipalDirectory>,
    timeout: Duration,
}

impl AuthenticationGate {
    /// Creates a new gate.
    pub fn new(
        decoder: Arc<TokenDecoder>,
        sessions: Arc<SessionStore>,
        directory: Arc<dyn PrincipalDirectory>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            decoder,
            sessions,
            directory,
            timeout: config.operation_timeout(),
        }
    }

    /// Authenticates a bearer token.
    ///
    /// Every rejection is `Authentication` with the same message. Only a
    /// failing or slow directory yields `Internal`.
    pub async fn authenticate(&self, token: &str) -> AppResult<Authenticated> {
        let claims = self.decoder.parse(token).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            AppError::from(e)
        })?;

        if !self.sessions.is_live(claims.uid, claims.jti).await {
            debug!(principal_id = claims.uid, jti = %claims.jti, "Session not live");
            return Err(AppError::authentication(REJECTED_CREDENTIAL));
        }

        let lookup = bounded(
            self.timeout,
            "principal lookup",
            self.directory.find_by_id(claims.uid),
        )
        .await;

        match lookup {
            Ok(Some(principal)) => Ok(Authenticated { principal, claims }),
            Ok(None) => {
                warn!(principal_id = claims.uid, jti = %claims.jti, "Live session for missing principal");
                Err(AppError::authentication(REJECTED_CREDENTIAL))
            }
            Err(e) => {
                error!(principal_id = claims.uid, error = %e, "Principal lookup failed");
                Err(AppError::internal("Failed to resolve principal"))
            }
        }
    }

    /// Reads the `Authorization` header value and authenticates it.
    pub async fn authenticate_header(&self, header: Option<&str>) -> AppResult<Authenticated> {
        let token = extract_bearer(header)?;
        self.authenticate(token).await
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: Option<&str>) -> AppResult<&str> {
    let value = header.ok_or_else(|| AppError::authentication("Missing authorization header"))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::authentication("Invalid authorization header format"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::authentication("Invalid authorization header format"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::authentication("Missing bearer token"));
    }
    Ok(token)
}
