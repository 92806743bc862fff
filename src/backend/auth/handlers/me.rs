/**
 * Current User Handler
 *
 * This module implements GET /api/v1/me, which returns the resource of the
 * authenticated user including its roles.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::CurrentUser;
use crate::backend::server::state::AppState;

/// View handler
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "name": "Admin",
///   "email": "admin@masagena.test",
///   "email_verified_at": null,
///   "created_at": "2025-01-01T00:00:00Z",
///   "updated_at": "2025-01-01T00:00:00Z",
///   "roles": ["Admin"]
/// }
/// ```
pub async fn view(
    State(app_state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Response {
    match principal {
        Some(principal) => Json(UserResponse::from(&principal.user)).into_response(),
        None => app_state
            .config
            .error_policy
            .render(BackendError::unauthenticated("Unauthenticated."), StatusCode::OK),
    }
}
