//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use grader_auth::bounded;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// 503 when the session store or the database does not answer in time.
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let store_up = state.session_store.health_check().await;

    let database = match &state.database {
        Some(pool) => Some(
            bounded(state.operation_timeout(), "database health", pool.health_check())
                .await
                .is_ok(),
        ),
        None => None,
    };

    let healthy = store_up && database.unwrap_or(true);
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            session_store: up_or_down(store_up).to_string(),
            database: database.map_or("memory", up_or_down).to_string(),
        })),
    )
}

fn up_or_down(up: bool) -> &'static str {
    if up { "up" } else { "down" }
}
