/**
 * Application State Management
 *
 * This module defines the application state shared by every handler.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The user store (users and bearer tokens)
 * - The notification store
 * - The session store
 * - The authorization policy
 * - The loaded configuration
 *
 * # Thread Safety
 *
 * Stores are `Arc<dyn Trait>` handles whose implementations synchronize
 * internally. `SessionStore` wraps an `Arc<RwLock<..>>` and is cheap to clone.
 *
 * # Example
 *
 * ```rust,ignore
 * use masagena::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let user = state.users.find_by_email("admin@masagena.test").await;
 *     // ...
 * }
 * ```
 */

use std::sync::Arc;

use crate::backend::auth::policy::AuthorizationPolicy;
use crate::backend::auth::sessions::SessionStore;
use crate::backend::auth::users::UserStore;
use crate::backend::notifications::models::NotificationStore;
use crate::backend::store::{MemoryStore, PgStore};
use crate::shared::AppConfig;

/// Application state shared by all handlers
///
/// # Fields
///
/// * `users` - User and access token persistence
/// * `notifications` - Notification persistence
/// * `sessions` - Server-side sessions
/// * `policy` - Role to permission mapping
/// * `config` - Loaded configuration (error policy, cookie settings, ...)
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub sessions: SessionStore,
    pub policy: Arc<AuthorizationPolicy>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state from explicit store handles
    pub fn new(
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            users,
            notifications,
            sessions: SessionStore::from_config(&config),
            policy: Arc::new(AuthorizationPolicy::default()),
            config: Arc::new(config),
        }
    }

    /// State backed by one `MemoryStore`
    pub fn in_memory(store: MemoryStore, config: AppConfig) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, config)
    }

    /// State backed by PostgreSQL
    pub fn postgres(store: PgStore, config: AppConfig) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, config)
    }

    /// Replace the authorization policy
    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }
}
