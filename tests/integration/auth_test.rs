//! Integration tests for the authentication flow.

mod helpers;

use axum::http::StatusCode;
use grader_core::traits::hash_store::HashStore;
use serde_json::json;

#[tokio::test]
async fn test_signup_authenticate_then_wrong_password() {
    let app = helpers::TestApp::new();

    let token = app.signup("ann", "pw").await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["name"], "ann");
    assert_eq!(me.data()["is_admin"], false);
    assert!(me.data().get("password_hash").is_none());

    let bad = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "name": "ann", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert!(bad.body.get("data").is_none());

    let sessions = app
        .request("GET", "/api/auth/sessions", None, Some(&token))
        .await;
    assert_eq!(sessions.status, StatusCode::OK);
    let list = sessions.data().as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["current"], true);
}

#[tokio::test]
async fn test_login_opens_additional_session() {
    let app = helpers::TestApp::new();
    let first = app.signup("ann", "pw").await;
    let second = app.login("ann", "pw").await;
    assert_ne!(first, second);

    for token in [&first, &second] {
        let me = app.request("GET", "/api/auth/me", None, Some(token)).await;
        assert_eq!(me.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "name": "nobody", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_signup() {
    let app = helpers::TestApp::new();
    app.signup("ann", "pw").await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "ann", "password": "other" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_and_bogus_credentials() {
    let app = helpers::TestApp::new();

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let bogus = app
        .request("GET", "/api/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(bogus.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bogus.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_logout_revokes_only_that_session() {
    let app = helpers::TestApp::new();
    let first = app.signup("ann", "pw").await;
    let second = app.login("ann", "pw").await;

    let out = app
        .request("POST", "/api/auth/logout", None, Some(&first))
        .await;
    assert_eq!(out.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&first)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let me = app.request("GET", "/api/auth/me", None, Some(&second)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_all() {
    let app = helpers::TestApp::new();
    let first = app.signup("ann", "pw").await;
    let second = app.login("ann", "pw").await;

    let out = app
        .request("POST", "/api/auth/logout/all", None, Some(&second))
        .await;
    assert_eq!(out.status, StatusCode::OK);

    for token in [&first, &second] {
        let me = app.request("GET", "/api/auth/me", None, Some(token)).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_deleted_user_token_rejected() {
    let app = helpers::TestApp::new();
    let token = app.signup("ann", "pw").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    let id = me.data()["id"].as_i64().unwrap();

    app.directory.remove(id);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_store_outage_fails_closed() {
    let app = helpers::TestApp::new();
    let token = app.signup("ann", "pw").await;

    app.sessions.close().await.unwrap();

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let signup = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "bob", "password": "pw" })),
            None,
        )
        .await;
    assert_eq!(signup.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(signup.body["message"], "Internal server error");
    assert!(signup.body.get("data").is_none());

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health.data()["session_store"], "down");
}
