/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, seeding, state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect the database if one is configured
 * 2. Otherwise create and seed the in-memory store
 * 3. Create the application state
 * 4. Create the router
 * 5. Start the session pruning task
 */

use std::time::Duration;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::backend::store::{self, MemoryStore, PgStore};
use crate::shared::AppConfig;

/// How often expired sessions are pruned
pub const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Build the application state for a configuration
///
/// Seed failures are logged; the server still starts.
pub async fn build_state(config: AppConfig) -> AppState {
    if let Some(pool) = load_database(&config).await {
        tracing::info!("Using PostgreSQL store");
        return AppState::postgres(PgStore::new(pool), config);
    }

    let memory = MemoryStore::new();
    if let Err(e) = store::seed(&memory, &memory, &config.seed, config.bcrypt_cost).await {
        tracing::error!("Failed to seed in-memory store: {}", e);
    }
    tracing::info!(
        "Using in-memory store with {} seeded users",
        config.seed.users.len()
    );

    AppState::in_memory(memory, config)
}

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing Masagena backend server");

    let app_state = build_state(config).await;
    let app = create_router(app_state.clone());

    // Start periodic cleanup task for expired sessions
    let sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let pruned = sessions.prune_expired().await;
            tracing::debug!("Pruned {} expired sessions", pruned);
        }
    });

    tracing::info!("Router configured with periodic session cleanup task");

    app
}
