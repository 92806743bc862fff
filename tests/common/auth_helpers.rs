//! Authentication test helpers
//!
//! Provides an in-memory application served by `axum_test::TestServer`,
//! fixtures for users and notifications, and request helpers for bearer and
//! session authenticated calls.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestResponse, TestServer};
use serde_json::{json, Value};
use uuid::Uuid;

use masagena::backend::auth::policy::Role;
use masagena::backend::auth::users::{hash_password, NewUser, User, UserStore};
use masagena::backend::notifications::models::{
    NewNotification, Notification, NotificationStore, ADMIN_NOTIFICATION_TYPE,
};
use masagena::backend::routes::create_router;
use masagena::backend::server::state::AppState;
use masagena::backend::store::MemoryStore;
use masagena::shared::{AppConfig, ErrorPolicy};

pub const ADMIN_EMAIL: &str = "admin@masagena.test";
pub const ADMIN_PASSWORD: &str = "12345678";
pub const SESSION_COOKIE: &str = "masagena_session";

/// Test configuration with a cheap bcrypt cost
pub fn test_config(policy: ErrorPolicy) -> AppConfig {
    AppConfig::builder()
        .error_policy(policy)
        .bcrypt_cost(4)
        .build()
        .expect("test configuration is valid")
}

/// Application under test
pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(ErrorPolicy::Strict)
    }

    pub fn with_policy(policy: ErrorPolicy) -> Self {
        let store = MemoryStore::new();
        let state = AppState::in_memory(store.clone(), test_config(policy));
        Self::from_state(store, state)
    }

    /// Serve a prepared state; `store` should be the state's user store
    pub fn from_state(store: MemoryStore, state: AppState) -> Self {
        let server = TestServer::new(create_router(state.clone())).expect("start test server");
        Self {
            server,
            store,
            state,
        }
    }

    pub async fn create_user(&self, name: &str, email: &str, password: &str, roles: &[&str]) -> User {
        self.store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password, 4).expect("hash password"),
                roles: roles.iter().map(|r| Role::from_label(r)).collect(),
            })
            .await
            .expect("create user")
    }

    pub async fn create_admin(&self) -> User {
        self.create_user("Admin", ADMIN_EMAIL, ADMIN_PASSWORD, &["Admin"]).await
    }

    pub async fn create_editor(&self) -> User {
        self.create_user("Editor", "editor@masagena.test", "editorpass", &["Editor"])
            .await
    }

    pub async fn add_notification(&self, owner: Uuid, message: &str, read: bool) -> Notification {
        self.add_raw_notification(
            owner,
            json!({ "message": message, "created_at": "2025-01-01 10:00:00" }),
            read,
        )
        .await
    }

    pub async fn add_raw_notification(&self, owner: Uuid, data: Value, read: bool) -> Notification {
        self.store
            .create_notification(NewNotification {
                notifiable_id: owner,
                kind: ADMIN_NOTIFICATION_TYPE.to_string(),
                data,
                read_at: read.then(chrono::Utc::now),
            })
            .await
            .expect("create notification")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        with_bearer(self.server.get(uri), token).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>) -> TestResponse {
        with_bearer(self.server.post(uri), token).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.server.post(uri).json(body).await
    }

    /// GET authenticated by session cookie
    pub async fn get_with_session(&self, uri: &str, session_id: &str) -> TestResponse {
        self.server
            .get(uri)
            .add_header(header::COOKIE, session_cookie(session_id))
            .await
    }

    /// POST authenticated by session cookie
    pub async fn post_with_session(&self, uri: &str, session_id: &str) -> TestResponse {
        self.server
            .post(uri)
            .add_header(header::COOKIE, session_cookie(session_id))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/v1/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Log in and return the plain-text bearer token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(
            response.status_code(),
            StatusCode::OK,
            "login failed: {}",
            response.text()
        );
        response.json::<Value>()["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }
}

fn with_bearer(request: TestRequest, token: Option<&str>) -> TestRequest {
    match token {
        Some(token) => request.authorization_bearer(token),
        None => request,
    }
}

/// `Cookie` header carrying a session ID
pub fn session_cookie(session_id: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, session_id))
        .expect("session ID is a valid header value")
}
