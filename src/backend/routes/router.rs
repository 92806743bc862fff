/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * Outermost first:
 * 1. `TraceLayer` - request spans
 * 2. `resolve_principal` - attaches the request's `Principal`
 */

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::middleware::auth::resolve_principal;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state holding the stores and sessions
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    // Fallback handler for 404
    let router = router.fallback(not_found);

    router
        .layer(from_fn_with_state(app_state.clone(), resolve_principal))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(MessageResponse::new("Not Found")))
}
