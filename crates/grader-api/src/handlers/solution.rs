//! Solution submission handler.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::info;

use grader_auth::bounded;
use grader_core::error::AppError;
use grader_entity::solution::NewSolution;

use crate::dto::response::{ApiResponse, SolutionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/tasks/{id}/solutions
///
/// The raw request body is the solution. It is queued for the grading
/// worker with status `new`.
pub async fn submit_solution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<i32>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<SolutionResponse>>), ApiError> {
    if body.is_empty() {
        return Err(AppError::validation("Solution body must not be empty").into());
    }

    let timeout = state.operation_timeout();
    bounded(timeout, "task lookup", state.task_catalog.find_by_id(task_id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))?;

    let solution = bounded(
        timeout,
        "solution enqueue",
        state.solution_queue.enqueue(NewSolution {
            task_id,
            user_id: auth.principal.id,
            payload: body.to_vec(),
        }),
    )
    .await?;

    info!(
        solution_id = solution.id,
        task_id,
        principal_id = auth.principal.id,
        bytes = body.len(),
        "Solution queued"
    );
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(solution.into()))))
}
