//! Task catalog handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use grader_auth::bounded;
use grader_core::error::AppError;
use grader_entity::task::NewTask;

use crate::dto::request::{CreateTaskRequest, validate_request};
use crate::dto::response::{ApiResponse, TaskResponse};
use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TaskResponse>>>, ApiError> {
    let tasks = bounded(
        state.operation_timeout(),
        "task list",
        state.task_catalog.list(),
    )
    .await?;
    Ok(Json(ApiResponse::ok(
        tasks.into_iter().map(TaskResponse::from).collect(),
    )))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TaskResponse>>, ApiError> {
    let task = bounded(
        state.operation_timeout(),
        "task lookup",
        state.task_catalog.find_by_id(id),
    )
    .await?
    .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?;
    Ok(Json(ApiResponse::ok(task.into())))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TaskResponse>>), ApiError> {
    validate_request(&req)?;

    let task = bounded(
        state.operation_timeout(),
        "task create",
        state.task_catalog.create(NewTask {
            name: req.name,
            description: req.description,
        }),
    )
    .await?;

    info!(task_id = task.id, principal_id = admin.principal.id, "Task created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task.into()))))
}
