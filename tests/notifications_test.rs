//! Notification inbox endpoint tests
//!
//! Covers authorization, listing counters, single and bulk mark-as-read, and
//! error rendering under both policies.

#[macro_use]
mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{test_config, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use masagena::backend::auth::policy::{AuthorizationPolicy, Permission, Role};
use masagena::backend::notifications::models::{NewNotification, Notification, NotificationStore};
use masagena::backend::server::state::AppState;
use masagena::backend::store::{MemoryStore, StoreError};
use masagena::shared::ErrorPolicy;

const MARK_ALL: &str = "/api/v1/notifications/mark-all-read";

fn mark_one(id: impl std::fmt::Display) -> String {
    format!("/api/v1/notifications/{}/mark-as-read", id)
}

async fn admin_app(policy: ErrorPolicy) -> (TestApp, Uuid, String) {
    let app = TestApp::with_policy(policy);
    let admin = app.create_admin().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    (app, admin.id, token)
}

#[tokio::test]
async fn test_non_admin_is_forbidden_everywhere() {
    for policy in [ErrorPolicy::Strict, ErrorPolicy::Compat] {
        let app = TestApp::with_policy(policy);
        let editor = app.create_editor().await;
        let notification = app.add_notification(editor.id, "hello", false).await;
        let token = app.login_token("editor@masagena.test", "editorpass").await;

        let response = app.get("/api/v1/notifications", Some(&token)).await;
        assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");

        let response = app.post(&mark_one(notification.id), Some(&token)).await;
        assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");

        let response = app.post(MARK_ALL, Some(&token)).await;
        assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");

        let stored = app.store.find_for(editor.id, notification.id).await.unwrap().unwrap();
        assert!(stored.read_at.is_none());
    }
}

#[tokio::test]
async fn test_anonymous_is_forbidden() {
    let app = TestApp::new();
    let response = app.get("/api/v1/notifications", None).await;
    assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");

    let response = app.post(MARK_ALL, None).await;
    assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");
}

#[tokio::test]
async fn test_admin_role_is_case_sensitive() {
    let app = TestApp::new();
    app.create_user("Lower", "lower@masagena.test", "lowerpass", &["admin"])
        .await;
    let token = app.login_token("lower@masagena.test", "lowerpass").await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");
}

#[tokio::test]
async fn test_empty_inbox() {
    for policy in [ErrorPolicy::Strict, ErrorPolicy::Compat] {
        let (app, _, token) = admin_app(policy).await;
        let response = app.get("/api/v1/notifications", Some(&token)).await;
        assert_message!(response, StatusCode::NOT_FOUND, "No notifications found");
    }
}

#[tokio::test]
async fn test_index_counts_and_projection() {
    let (app, admin_id, token) = admin_app(ErrorPolicy::Strict).await;
    for i in 0..2 {
        app.add_notification(admin_id, &format!("read {}", i), true).await;
    }
    for i in 0..3 {
        app.add_notification(admin_id, &format!("unread {}", i), false).await;
    }
    let other = app.create_editor().await;
    app.add_notification(other.id, "not yours", false).await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["readed"], json!(2));
    assert_eq!(body["unread"], json!(3));
    assert_eq!(body["count"], json!(5));

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["message"], json!("unread 2"));
    assert_eq!(data[0]["is_read"], json!(0));
    assert_eq!(data[0]["created_at_message"], json!("2025-01-01 10:00:00"));
    assert!(data[0]["read_at"].is_null());
    assert_eq!(data[4]["message"], json!("read 0"));
    assert_eq!(data[4]["is_read"], json!(1));
    assert!(data[4]["read_at"].is_string());
    assert!(data.iter().all(|n| n["message"] != json!("not yours")));
}

#[tokio::test]
async fn test_malformed_payload() {
    let (app, admin_id, token) = admin_app(ErrorPolicy::Strict).await;
    app.add_raw_notification(admin_id, json!({"created_at": "today"}), false)
        .await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_message!(response, StatusCode::INTERNAL_SERVER_ERROR, "Server Error");

    let (app, admin_id, token) = admin_app(ErrorPolicy::Compat).await;
    app.add_raw_notification(admin_id, json!({"message": "no date"}), false)
        .await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_contains!(body["msg"].as_str().unwrap(), "Malformed payload");
}

#[tokio::test]
async fn test_mark_as_read() {
    let (app, admin_id, token) = admin_app(ErrorPolicy::Strict).await;
    let notification = app.add_notification(admin_id, "hello", false).await;

    let response = app.post(&mark_one(notification.id), Some(&token)).await;
    assert_message!(response, StatusCode::OK, "Notification marked as read");

    let stored = app.store.find_for(admin_id, notification.id).await.unwrap().unwrap();
    let first_read_at = stored.read_at.expect("read_at set");

    let response = app.post(&mark_one(notification.id), Some(&token)).await;
    assert_message!(response, StatusCode::OK, "Notification marked as read");
    let stored = app.store.find_for(admin_id, notification.id).await.unwrap().unwrap();
    assert_eq!(stored.read_at, Some(first_read_at));
}

#[tokio::test]
async fn test_mark_as_read_never_touches_foreign_notifications() {
    let (app, _, token) = admin_app(ErrorPolicy::Strict).await;
    let other = app
        .create_user("Other Admin", "other@masagena.test", "otherpass", &["Admin"])
        .await;
    let foreign = app.add_notification(other.id, "theirs", false).await;

    let response = app.post(&mark_one(foreign.id), Some(&token)).await;
    assert_message!(
        response,
        StatusCode::NOT_FOUND,
        format!("No query results for notification [{}]", foreign.id)
    );

    let stored = app.store.find_for(other.id, foreign.id).await.unwrap().unwrap();
    assert!(stored.read_at.is_none());
}

#[tokio::test]
async fn test_mark_as_read_not_found_compat() {
    let (app, _, token) = admin_app(ErrorPolicy::Compat).await;
    let missing = Uuid::new_v4();

    let response = app.post(&mark_one(missing), Some(&token)).await;
    assert_msg!(
        response,
        StatusCode::OK,
        format!("No query results for notification [{}]", missing)
    );
}

#[tokio::test]
async fn test_mark_as_read_unparsable_id() {
    let (app, _, token) = admin_app(ErrorPolicy::Strict).await;
    let response = app.post(&mark_one("42"), Some(&token)).await;
    assert_message!(
        response,
        StatusCode::NOT_FOUND,
        "No query results for notification [42]"
    );
}

#[tokio::test]
async fn test_mark_all_as_read_is_idempotent() {
    let (app, admin_id, token) = admin_app(ErrorPolicy::Strict).await;
    for i in 0..3 {
        app.add_notification(admin_id, &format!("n{}", i), false).await;
    }
    app.add_notification(admin_id, "already", true).await;
    let other = app.create_editor().await;
    let foreign = app.add_notification(other.id, "theirs", false).await;

    for _ in 0..2 {
        let response = app.post(MARK_ALL, Some(&token)).await;
        assert_message!(response, StatusCode::OK, "All notifications marked as read");
    }

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    let body: Value = response.json();
    assert_eq!(body["readed"], json!(4));
    assert_eq!(body["unread"], json!(0));

    let stored = app.store.find_for(other.id, foreign.id).await.unwrap().unwrap();
    assert!(stored.read_at.is_none());
}

/// Notification store whose every call fails
struct OfflineNotifications;

#[async_trait]
impl NotificationStore for OfflineNotifications {
    async fn notifications_for(&self, _owner: Uuid) -> Result<Vec<Notification>, StoreError> {
        Err(StoreError::Conflict("store offline".to_string()))
    }

    async fn find_for(&self, _owner: Uuid, _id: Uuid) -> Result<Option<Notification>, StoreError> {
        Err(StoreError::Conflict("store offline".to_string()))
    }

    async fn mark_read(&self, _owner: Uuid, _id: Uuid, _at: DateTime<Utc>) -> Result<bool, StoreError> {
        Err(StoreError::Conflict("store offline".to_string()))
    }

    async fn mark_all_read(&self, _owner: Uuid, _at: DateTime<Utc>) -> Result<u64, StoreError> {
        Err(StoreError::Conflict("store offline".to_string()))
    }

    async fn create_notification(
        &self,
        _notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        Err(StoreError::Conflict("store offline".to_string()))
    }
}

fn offline_app(policy: ErrorPolicy) -> TestApp {
    let store = MemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(OfflineNotifications),
        test_config(policy),
    );
    TestApp::from_state(store, state)
}

#[tokio::test]
async fn test_store_failures_follow_catch_all_status() {
    let app = offline_app(ErrorPolicy::Compat);
    app.create_admin().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app.post(MARK_ALL, Some(&token)).await;
    assert_msg!(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Conflict: store offline"
    );

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_msg!(response, StatusCode::OK, "Conflict: store offline");

    let app = offline_app(ErrorPolicy::Strict);
    app.create_admin().await;
    let token = app.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_message!(response, StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
}

#[tokio::test]
async fn test_custom_policy_grants() {
    let store = MemoryStore::new();
    let state = AppState::in_memory(store.clone(), test_config(ErrorPolicy::Strict)).with_policy(
        AuthorizationPolicy::empty().grant(Role::from_label("Support"), [Permission::ViewNotifications]),
    );
    let app = TestApp::from_state(store, state);
    let support = app
        .create_user("Support", "support@masagena.test", "supportpass", &["Support"])
        .await;
    app.add_notification(support.id, "ticket", false).await;
    let token = app.login_token("support@masagena.test", "supportpass").await;

    let response = app.get("/api/v1/notifications", Some(&token)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.json::<Value>()["count"], json!(1));

    let response = app.post(MARK_ALL, Some(&token)).await;
    assert_message!(response, StatusCode::FORBIDDEN, "Unauthorized");
}
