/**
 * API Route Handlers
 *
 * This module defines the versioned API routes:
 * - Authentication endpoints (login, logout, current user)
 * - Notification inbox endpoints
 *
 * Authentication is resolved once per request by the principal middleware
 * installed in `router::create_router`; each handler decides whether it
 * needs a principal.
 */

use axum::{
    routing::{get, post},
    Router,
};
use crate::backend::server::state::AppState;
use crate::backend::auth::{login, logout, view};
use crate::backend::notifications::{index, mark_all_as_read, mark_as_read};

/// Prefix of every API route
pub const API_PREFIX: &str = "/api/v1";

/// Configure API routes
///
/// ## Authentication Routes
/// - `POST /api/v1/login` - Public, returns a bearer token
/// - `POST /api/v1/logout` - Requires a principal
/// - `GET /api/v1/me` - Requires a principal
///
/// ## Notification Routes
/// - `GET /api/v1/notifications` - Administrators only
/// - `POST /api/v1/notifications/{id}/mark-as-read` - Administrators only
/// - `POST /api/v1/notifications/mark-all-read` - Administrators only
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let api = Router::new()
        // Authentication endpoints
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(view))
        // Notification endpoints
        .route("/notifications", get(index))
        .route("/notifications/{id}/mark-as-read", post(mark_as_read))
        .route("/notifications/mark-all-read", post(mark_all_as_read));

    router.nest(API_PREFIX, api)
}
