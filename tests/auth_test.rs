//! Authentication endpoint tests
//!
//! Drives login, logout and the current-user endpoint through the router
//! against the in-memory store, under both error policies.

#[macro_use]
mod common;

use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{session_cookie, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD, SESSION_COOKIE};
use masagena::shared::ErrorPolicy;

#[tokio::test]
async fn test_login_returns_token_and_user_with_roles() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let response = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();

    let token = body["token"].as_str().unwrap();
    let (id, secret) = token.split_once('|').unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(secret.len(), 40);

    assert_eq!(body["message"], json!("Login successful"));
    assert_eq!(body["user"]["id"], json!(admin.id));
    assert_eq!(body["user"]["email"], json!(ADMIN_EMAIL));
    assert_eq!(body["user"]["roles"], json!(["Admin"]));
    assert!(body["user"].get("password_hash").is_none());

    assert_eq!(app.store.token_count(admin.id).await, 1);
}

#[tokio::test]
async fn test_login_sets_session_and_csrf_cookies() {
    let app = TestApp::new();
    app.create_admin().await;

    let response = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_status!(response, StatusCode::OK);

    let session = response.cookie(SESSION_COOKIE);
    assert_eq!(session.http_only(), Some(true));
    assert_contains!(session.to_string(), "SameSite=Lax");

    let csrf = response.cookie("XSRF-TOKEN");
    assert_ne!(csrf.http_only(), Some(true));
    assert_eq!(csrf.value().len(), 40);
}

#[tokio::test]
async fn test_login_regenerates_existing_session() {
    let app = TestApp::new();
    app.create_admin().await;
    let existing = app.state.sessions.start().await.unwrap();

    let response = app
        .server
        .post("/api/v1/login")
        .add_header(header::COOKIE, session_cookie(&existing.id))
        .json(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
        .await;
    assert_status!(response, StatusCode::OK);

    let new_id = response.cookie(SESSION_COOKIE).value().to_string();
    assert_ne!(new_id, existing.id);
    assert!(app.state.sessions.load(&existing.id).await.is_none());
    assert!(app.state.sessions.load(&new_id).await.is_some());
}

#[tokio::test]
async fn test_login_wrong_password_strict() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let response = app.login(ADMIN_EMAIL, "wrong-password").await;
    assert_message!(response, StatusCode::UNAUTHORIZED, "The provided credentials are incorrect.");
    assert_eq!(app.store.token_count(admin.id).await, 0);
}

#[tokio::test]
async fn test_login_unknown_email_strict() {
    let app = TestApp::new();
    app.create_admin().await;

    let response = app.login("nobody@masagena.test", ADMIN_PASSWORD).await;
    assert_message!(response, StatusCode::UNAUTHORIZED, "The provided credentials are incorrect.");
}

#[tokio::test]
async fn test_login_invalid_credentials_compat() {
    let app = TestApp::with_policy(ErrorPolicy::Compat);
    app.create_admin().await;

    let response = app.login(ADMIN_EMAIL, "wrong-password").await;
    assert_msg!(response, StatusCode::OK, "The provided credentials are incorrect.");

    let response = app.login("nobody@masagena.test", ADMIN_PASSWORD).await;
    assert_msg!(response, StatusCode::OK, "The provided credentials are incorrect.");
}

#[tokio::test]
async fn test_login_validation_strict() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/login", &json!({})).await;
    assert_status!(response, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "The email field is required. (and 1 more error)",
            "errors": {
                "email": ["The email field is required."],
                "password": ["The password field is required."],
            }
        })
    );

    let response = app
        .post_json(
            "/api/v1/login",
            &json!({"email": "not-an-email", "password": "secret"}),
        )
        .await;
    assert_status!(response, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"email": ["The email field must be a valid email address."]})
    );
}

#[tokio::test]
async fn test_login_validation_compat() {
    let app = TestApp::with_policy(ErrorPolicy::Compat);

    let response = app.post_json("/api/v1/login", &json!({"password": 1234})).await;
    assert_msg!(
        response,
        StatusCode::OK,
        "The email field is required. (and 1 more error)"
    );
}

#[tokio::test]
async fn test_login_non_json_body_is_an_empty_request() {
    let app = TestApp::new();

    let response = app.server.post("/api/v1/login").text("email=admin").await;
    assert_status!(response, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["message"],
        json!("The email field is required. (and 1 more error)")
    );
}

#[tokio::test]
async fn test_logout_without_principal() {
    for policy in [ErrorPolicy::Strict, ErrorPolicy::Compat] {
        let app = TestApp::with_policy(policy);
        let response = app.post("/api/v1/logout", None).await;
        assert_message!(response, StatusCode::UNAUTHORIZED, "User not authenticated");
    }
}

#[tokio::test]
async fn test_logout_revokes_every_token() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let first = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let second = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(app.store.token_count(admin.id).await, 2);

    let response = app.post("/api/v1/logout", Some(&first)).await;
    assert_message!(response, StatusCode::OK, "Successfully logged out");
    assert!(!response.cookie(SESSION_COOKIE).value().is_empty());
    assert!(!response.cookie("XSRF-TOKEN").value().is_empty());
    assert_eq!(app.store.token_count(admin.id).await, 0);

    for token in [&first, &second] {
        let response = app.get("/api/v1/me", Some(token)).await;
        assert_message!(response, StatusCode::UNAUTHORIZED, "Unauthenticated.");
    }

    let response = app.post("/api/v1/logout", Some(&second)).await;
    assert_message!(response, StatusCode::UNAUTHORIZED, "User not authenticated");
}

#[tokio::test]
async fn test_view_with_token() {
    let app = TestApp::new();
    let admin = app.create_admin().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app.get("/api/v1/me", Some(&token)).await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"], json!(admin.id));
    assert_eq!(body["name"], json!("Admin"));
    assert_eq!(body["roles"], json!(["Admin"]));
}

#[tokio::test]
async fn test_bearer_scheme_accepts_any_case() {
    let app = TestApp::new();
    let admin = app.create_admin().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for scheme in ["bearer", "BEARER"] {
        let response = app
            .server
            .get("/api/v1/me")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("{} {}", scheme, token)).unwrap(),
            )
            .await;
        assert_status!(response, StatusCode::OK);
        assert_eq!(response.json::<Value>()["id"], json!(admin.id));
    }
}

#[tokio::test]
async fn test_view_without_principal() {
    for policy in [ErrorPolicy::Strict, ErrorPolicy::Compat] {
        let app = TestApp::with_policy(policy);
        let response = app.get("/api/v1/me", None).await;
        assert_message!(response, StatusCode::UNAUTHORIZED, "Unauthenticated.");

        let response = app.get("/api/v1/me", Some("garbage")).await;
        assert_message!(response, StatusCode::UNAUTHORIZED, "Unauthenticated.");
    }
}

#[tokio::test]
async fn test_session_cookie_authenticates_until_logout() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let login = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let session_id = login.cookie(SESSION_COOKIE).value().to_string();

    let response = app.get_with_session("/api/v1/me", &session_id).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], json!(admin.id));

    let response = app.post_with_session("/api/v1/logout", &session_id).await;
    assert_message!(response, StatusCode::OK, "Successfully logged out");
    let fresh_id = response.cookie(SESSION_COOKIE).value().to_string();
    assert_ne!(fresh_id, session_id);

    let response = app.get_with_session("/api/v1/me", &session_id).await;
    assert_message!(response, StatusCode::UNAUTHORIZED, "Unauthenticated.");

    let response = app.get_with_session("/api/v1/me", &fresh_id).await;
    assert_message!(response, StatusCode::UNAUTHORIZED, "Unauthenticated.");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();
    let response = app.get("/api/v1/nothing-here", None).await;
    assert_message!(response, StatusCode::NOT_FOUND, "Not Found");
}
