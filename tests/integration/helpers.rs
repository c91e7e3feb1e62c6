//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use grader_api::{AppState, build_app};
use grader_auth::PasswordHasher;
use grader_cache::memory::MemoryHashStore;
use grader_core::config::AppConfig;
use grader_database::memory::{MemorySolutionQueue, MemoryTaskCatalog, MemoryUserDirectory};
use grader_database::traits::{PrincipalDirectory, TaskCatalog};
use grader_entity::user::{NewUser, User};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// User directory, for seeding and removing users
    pub directory: Arc<MemoryUserDirectory>,
    /// Queue the submission handler writes to
    pub queue: Arc<MemorySolutionQueue>,
    /// Session backend, for simulating outages
    pub sessions: Arc<MemoryHashStore>,
}

impl TestApp {
    /// Create a new test application on in-memory backends
    pub fn new() -> Self {
        Self::with_task_catalog(Arc::new(MemoryTaskCatalog::new()))
    }

    /// Create a test application around the given task catalog
    pub fn with_task_catalog(task_catalog: Arc<dyn TaskCatalog>) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.cache.provider = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let directory = Arc::new(MemoryUserDirectory::new());
        let queue = Arc::new(MemorySolutionQueue::new());
        let sessions = Arc::new(MemoryHashStore::new());

        let state = AppState::new(
            config,
            sessions.clone(),
            directory.clone(),
            task_catalog,
            queue.clone(),
        )
        .expect("Failed to build state");

        Self {
            router: build_app(state.clone()),
            state,
            directory,
            queue,
            sessions,
        }
    }

    /// Insert an admin straight into the directory
    pub async fn create_admin(&self, name: &str, password: &str) -> User {
        let hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");
        self.directory
            .create(NewUser {
                name: name.to_string(),
                password_hash: hash,
                is_admin: true,
            })
            .await
            .expect("Failed to create admin")
    }

    /// Sign up and return the bearer token
    pub async fn signup(&self, name: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({ "name": name, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Signup failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Log in and return the bearer token
    pub async fn login(&self, name: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "name": name, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = body
            .map(|b| serde_json::to_vec(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(method, path, "application/json", body, token).await
    }

    /// Make a request with a raw body
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        token: Option<&str>,
    ) -> TestResponse {
        self.send(method, path, "application/octet-stream", body.to_vec(), token)
            .await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The token from a signup/login response
    pub fn token(&self) -> String {
        self.data()["token"]
            .as_str()
            .expect("No token in response")
            .to_string()
    }
}
