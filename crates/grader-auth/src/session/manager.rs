//! Session lifecycle manager: signup, login, and logout flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use grader_core::config::auth::{AuthConfig, MAX_SESSION_TTL_MINUTES};
use grader_core::config::session::SessionConfig;
use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_database::traits::PrincipalDirectory;
use grader_entity::user::{NewUser, User};

use crate::deadline::bounded;
use crate::jwt::{Claims, TokenEncoder};
use crate::password::PasswordHasher;

use super::store::SessionStore;

/// Longest accepted user name.
const MAX_NAME_LENGTH: usize = 64;

/// Credential handed back by a successful signup or login.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    /// Serialized session token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Issues and revokes sessions.
#[derive(Clone)]
pub struct SessionManager {
    /// Token signer.
    encoder: Arc<TokenEncoder>,
    /// Liveness records.
    sessions: Arc<SessionStore>,
    /// User directory.
    directory: Arc<dyn PrincipalDirectory>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Lifetime of every issued token.
    ttl: chrono::Duration,
    /// Minimum password length at signup.
    password_min_length: usize,
    /// Upper bound for each directory call.
    timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        encoder: Arc<TokenEncoder>,
        sessions: Arc<SessionStore>,
        directory: Arc<dyn PrincipalDirectory>,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            encoder,
            sessions,
            directory,
            hasher: PasswordHasher::new(),
            ttl: session_ttl(auth_config.session_ttl_minutes),
            password_min_length: auth_config.password_min_length,
            timeout: session_config.operation_timeout(),
        }
    }

    /// Creates a user and opens its first session.
    pub async fn signup(&self, name: &str, password: &str) -> AppResult<SessionGrant> {
        let name = name.trim();
        self.validate_signup(name, password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = bounded(
            self.timeout,
            "user create",
            self.directory.create(NewUser {
                name: name.to_string(),
                password_hash,
                is_admin: false,
            }),
        )
        .await?;

        info!(principal_id = user.id, name = %user.name, "User signed up");
        self.open_session(user).await
    }

    /// Verifies a name/password pair and opens a new session.
    ///
    /// Earlier sessions of the same user stay live.
    pub async fn login(&self, name: &str, password: &str) -> AppResult<SessionGrant> {
        let user = bounded(
            self.timeout,
            "user lookup",
            self.directory.find_by_name(name.trim()),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "User lookup failed during login");
            AppError::internal("Failed to look up user")
        })?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", name.trim())))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(principal_id = user.id, "Login rejected: wrong password");
            return Err(AppError::authentication("Invalid name or password"));
        }

        info!(principal_id = user.id, "User logged in");
        self.open_session(user).await
    }

    /// Revokes the session the claims belong to.
    pub async fn logout(&self, claims: &Claims) -> AppResult<()> {
        self.sessions.revoke(claims.uid, claims.jti).await?;
        info!(principal_id = claims.uid, jti = %claims.jti, "User logged out");
        Ok(())
    }

    /// Revokes every session of `principal_id`.
    pub async fn logout_everywhere(&self, principal_id: i64) -> AppResult<()> {
        self.sessions.revoke_all(principal_id).await
    }

    /// Signs a token and records it as live. No token leaves this function
    /// unless its liveness record was written.
    async fn open_session(&self, user: User) -> AppResult<SessionGrant> {
        let issued = self
            .encoder
            .issue(user.id, &user.name, Utc::now(), self.ttl)?;

        self.sessions
            .register(user.id, issued.jti, issued.expires_at)
            .await
            .map_err(|e| {
                error!(principal_id = user.id, error = %e, "Failed to register session");
                AppError::internal("Failed to register session")
            })?;

        Ok(SessionGrant {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    fn validate_signup(&self, name: &str, password: &str) -> AppResult<()> {
        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
        if password.chars().count() < self.password_min_length.max(1) {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length.max(1)
            )));
        }
        Ok(())
    }
}

/// Token lifetime, never longer than `MAX_SESSION_TTL_MINUTES`.
fn session_ttl(minutes: u64) -> chrono::Duration {
    chrono::Duration::minutes(minutes.min(MAX_SESSION_TTL_MINUTES) as i64)
}
