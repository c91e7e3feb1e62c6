//! Integration tests for the task catalog and submissions.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

use grader_core::result::AppResult;
use grader_database::traits::TaskCatalog;
use grader_entity::task::{NewTask, Task};

/// Catalog whose calls never complete.
#[derive(Debug)]
struct StalledCatalog;

#[async_trait]
impl TaskCatalog for StalledCatalog {
    async fn list(&self) -> AppResult<Vec<Task>> {
        std::future::pending().await
    }
    async fn find_by_id(&self, _: i32) -> AppResult<Option<Task>> {
        std::future::pending().await
    }
    async fn create(&self, _: NewTask) -> AppResult<Task> {
        std::future::pending().await
    }
}

async fn admin_token(app: &helpers::TestApp) -> String {
    app.create_admin("root", "secret").await;
    app.login("root", "secret").await
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["session_store"], "up");
    assert_eq!(response.data()["database"], "memory");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_catalog_is_internal_error() {
    let app = helpers::TestApp::with_task_catalog(Arc::new(StalledCatalog));
    let token = app.signup("ann", "pw").await;

    let list = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(list.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(list.body["message"], "Internal server error");

    let submit = app
        .request_raw("POST", "/api/tasks/1/solutions", b"print(1)", Some(&token))
        .await;
    assert_eq!(submit.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_list_tasks_is_public() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/tasks", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data(), &json!([]));
}

#[tokio::test]
async fn test_create_task_requires_admin() {
    let app = helpers::TestApp::new();
    let user = app.signup("ann", "pw").await;
    let body = json!({ "name": "sum", "description": "add two numbers" });

    let anonymous = app
        .request("POST", "/api/tasks", Some(body.clone()), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = app
        .request("POST", "/api/tasks", Some(body.clone()), Some(&user))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["error"], "FORBIDDEN");

    let admin = admin_token(&app).await;
    let created = app
        .request("POST", "/api/tasks", Some(body), Some(&admin))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data()["id"].as_i64().unwrap();

    let fetched = app
        .request("GET", &format!("/api/tasks/{id}"), None, None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["name"], "sum");

    let listed = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_task() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/tasks/99", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_solution() {
    let app = helpers::TestApp::new();
    let admin = admin_token(&app).await;
    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "name": "sum" })),
            Some(&admin),
        )
        .await;
    let id = created.data()["id"].as_i64().unwrap();
    let user = app.signup("ann", "pw").await;
    let path = format!("/api/tasks/{id}/solutions");

    let anonymous = app.request_raw("POST", &path, b"print(1)", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let empty = app.request_raw("POST", &path, b"", Some(&user)).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let accepted = app
        .request_raw("POST", &path, b"print(1)", Some(&user))
        .await;
    assert_eq!(accepted.status, StatusCode::ACCEPTED);
    assert_eq!(accepted.data()["status"], "new");

    let pending = app.queue.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload, b"print(1)".to_vec());
    assert_eq!(pending[0].task_id as i64, id);

    let missing = app
        .request_raw("POST", "/api/tasks/999/solutions", b"x", Some(&user))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
