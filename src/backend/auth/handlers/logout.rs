/**
 * Logout Handler
 *
 * This module implements POST /api/v1/logout. Logging out revokes every
 * bearer token of the user, drops the current session and hands back a
 * fresh anonymous session with a new CSRF token.
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Response},
};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::{CurrentUser, Principal};
use crate::backend::server::state::AppState;

/// Logout handler
///
/// Anonymous requests get 401 `{"message": "User not authenticated"}` under
/// every error policy.
pub async fn logout(
    State(app_state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    headers: HeaderMap,
) -> Response {
    let result = match principal {
        Some(principal) => perform_logout(&app_state, &headers, &principal).await,
        None => Err(BackendError::unauthenticated("User not authenticated")),
    };

    match result {
        Ok(response) => response,
        Err(e) => app_state.config.error_policy.render(e, StatusCode::OK),
    }
}

async fn perform_logout(
    app_state: &AppState,
    headers: &HeaderMap,
    principal: &Principal,
) -> Result<Response, BackendError> {
    let revoked = app_state.users.delete_tokens_for(principal.user.id).await?;

    let sessions = &app_state.sessions;
    let current = sessions.load_or_start(headers).await?;
    let mut session = sessions.invalidate(&current).await?;
    sessions.regenerate_token(&mut session).await?;
    let [session_cookie, csrf_cookie] = sessions.cookie_headers(&session)?;

    tracing::info!(
        "User {} logged out, revoked {} tokens",
        principal.user.id,
        revoked
    );

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie), (SET_COOKIE, csrf_cookie)]),
        Json(MessageResponse::new("Successfully logged out")),
    )
        .into_response())
}
