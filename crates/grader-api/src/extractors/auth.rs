//! `AuthUser` and `AdminUser` extractors: run the authentication gate on
//! the bearer token and hand the resolved principal to the handler.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use grader_auth::Authenticated;
use grader_auth::gate::require_admin;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Authenticated);

impl std::ops::Deref for AuthUser {
    type Target = Authenticated;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let authenticated = state.gate.authenticate_header(header).await?;
        Ok(AuthUser(authenticated))
    }
}

/// An authenticated caller holding the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Authenticated);

impl std::ops::Deref for AdminUser {
    type Target = Authenticated;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(authenticated) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(&authenticated.principal)?;
        Ok(AdminUser(authenticated))
    }
}
