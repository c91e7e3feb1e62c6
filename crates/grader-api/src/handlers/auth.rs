//! Auth handlers: signup, login, logout, me, sessions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{CredentialsRequest, validate_request};
use crate::dto::response::{
    ApiResponse, MessageResponse, SessionResponse, TokenResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), ApiError> {
    validate_request(&req)?;

    let grant = state.session_manager.signup(&req.name, &req.password).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(grant.into()))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    validate_request(&req)?;

    let grant = state.session_manager.login(&req.name, &req.password).await?;

    Ok(Json(ApiResponse::ok(grant.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.session_manager.logout(&auth.claims).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// POST /api/auth/logout/all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .session_manager
        .logout_everywhere(auth.principal.id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "All sessions terminated".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    let AuthUser(authenticated) = auth;
    Json(ApiResponse::ok(authenticated.principal.into()))
}

/// GET /api/auth/sessions
pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, ApiError> {
    let current = auth.claims.jti.to_string();
    let live = state.session_store.live_sessions(auth.principal.id).await?;

    Ok(Json(ApiResponse::ok(
        live.into_iter()
            .map(|s| SessionResponse::new(s, &current))
            .collect(),
    )))
}
