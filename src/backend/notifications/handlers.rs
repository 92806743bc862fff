/**
 * Notification Inbox Handlers
 *
 * Handlers for the administrator notification inbox:
 *
 * - `index` - GET /api/v1/notifications
 * - `mark_as_read` - POST /api/v1/notifications/{id}/mark-as-read
 * - `mark_all_as_read` - POST /api/v1/notifications/mark-all-read
 *
 * Every handler authorizes the principal against the `AuthorizationPolicy`
 * first and only ever touches the principal's own notifications.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::policy::Permission;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::{CurrentUser, Principal};
use crate::backend::notifications::models::NotificationIndex;
use crate::backend::server::state::AppState;

/// List the principal's notifications, newest first
///
/// # Example Response
///
/// ```json
/// {
///   "data": [
///     {
///       "id": "0d3b...",
///       "message": "New order placed",
///       "created_at_message": "2025-01-01 10:00:00",
///       "read_at": null,
///       "is_read": 0,
///       "created_at": "2025-01-01T10:00:00Z",
///       "updated_at": "2025-01-01T10:00:00Z"
///     }
///   ],
///   "readed": 0,
///   "unread": 1,
///   "count": 1
/// }
/// ```
///
/// An empty inbox answers 404 `{"message": "No notifications found"}`.
pub async fn index(
    State(app_state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Response {
    match list_notifications(&app_state, principal.as_ref()).await {
        Ok(response) => response,
        Err(e) => app_state.config.error_policy.render(e, StatusCode::OK),
    }
}

async fn list_notifications(
    app_state: &AppState,
    principal: Option<&Principal>,
) -> Result<Response, BackendError> {
    let principal = app_state
        .policy
        .authorize(principal, Permission::ViewNotifications)?;

    let notifications = app_state
        .notifications
        .notifications_for(principal.user.id)
        .await?;

    if notifications.is_empty() {
        tracing::debug!("No notifications for user {}", principal.user.id);
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("No notifications found")),
        )
            .into_response());
    }

    let index = NotificationIndex::build(&notifications)?;
    Ok(Json(index).into_response())
}

/// Mark one of the principal's notifications read
///
/// Unknown, foreign and unparsable IDs are all `NotFound`. Marking an
/// already-read notification succeeds without moving its `read_at`.
pub async fn mark_as_read(
    State(app_state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match mark_one(&app_state, principal.as_ref(), &id).await {
        Ok(response) => response,
        Err(e) => app_state.config.error_policy.render(e, StatusCode::OK),
    }
}

async fn mark_one(
    app_state: &AppState,
    principal: Option<&Principal>,
    id: &str,
) -> Result<Response, BackendError> {
    let principal = app_state
        .policy
        .authorize(principal, Permission::ManageNotifications)?;
    let owner = principal.user.id;

    let not_found = || BackendError::not_found(format!("No query results for notification [{}]", id));
    let notification_id = Uuid::parse_str(id).map_err(|_| not_found())?;

    let notification = app_state
        .notifications
        .find_for(owner, notification_id)
        .await?
        .ok_or_else(not_found)?;

    if !notification.is_read() {
        app_state
            .notifications
            .mark_read(owner, notification.id, Utc::now())
            .await?;
        tracing::info!("Notification {} marked as read by {}", notification.id, owner);
    }

    Ok(Json(MessageResponse::new("Notification marked as read")).into_response())
}

/// Mark every unread notification of the principal read
///
/// Idempotent. The catch-all status of this endpoint is 500.
pub async fn mark_all_as_read(
    State(app_state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Response {
    match mark_all(&app_state, principal.as_ref()).await {
        Ok(response) => response,
        Err(e) => app_state
            .config
            .error_policy
            .render(e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn mark_all(
    app_state: &AppState,
    principal: Option<&Principal>,
) -> Result<Response, BackendError> {
    let principal = app_state
        .policy
        .authorize(principal, Permission::ManageNotifications)?;

    let updated = app_state
        .notifications
        .mark_all_read(principal.user.id, Utc::now())
        .await?;
    tracing::info!(
        "Marked {} notifications as read for {}",
        updated,
        principal.user.id
    );

    Ok(Json(MessageResponse::new("All notifications marked as read")).into_response())
}
