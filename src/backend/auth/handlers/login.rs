/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/v1/login.
 *
 * # Authentication Process
 *
 * 1. Validate the email and password fields
 * 2. Look up user by exact email
 * 3. Verify password using bcrypt
 * 4. Regenerate the session and bind it to the user
 * 5. Issue a bearer token and return it with the user resource
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same error
 * - Only the hash of the issued token is stored
 * - The session ID changes on login
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Response},
};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse, UserResponse};
use crate::backend::auth::tokens::issue_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// A body that is not a JSON object is treated as an empty request, so it
/// fails validation like one.
///
/// # Errors
///
/// Rendered through the configured `ErrorPolicy` with a catch-all status of
/// 200:
///
/// * `Validation` - missing or malformed fields
/// * `InvalidCredentials` - unknown email or wrong password
///
/// # Example Request
///
/// ```http
/// POST /api/v1/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "admin@masagena.test",
///   "password": "12345678"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "token": "9b2f1c3e-1d7a-4c55-9a1e-2f6f0b7c8d9e|Xk3...",
///   "user": { "id": "...", "name": "Admin", "email": "admin@masagena.test", "roles": ["Admin"] },
///   "message": "Login successful"
/// }
/// ```
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable login body: {}", rejection);
            LoginRequest::default()
        }
    };

    match attempt_login(&app_state, &headers, &request).await {
        Ok(response) => response,
        Err(e) => app_state.config.error_policy.render(e, StatusCode::OK),
    }
}

async fn attempt_login(
    app_state: &AppState,
    headers: &HeaderMap,
    request: &LoginRequest,
) -> Result<Response, BackendError> {
    let (email, password) = request.validate()?;

    let user = app_state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login attempt for unknown email: {}", email);
            BackendError::InvalidCredentials
        })?;

    if !user.verify_password(password)? {
        tracing::warn!("Invalid password for user: {}", user.id);
        return Err(BackendError::InvalidCredentials);
    }

    let sessions = &app_state.sessions;
    let current = sessions.load_or_start(headers).await?;
    let mut session = sessions.regenerate(&current).await?;
    sessions.login(&mut session, user.id).await;

    let issued = issue_token(app_state.users.as_ref(), &user, &app_state.config.token_suffix).await?;
    let [session_cookie, csrf_cookie] = sessions.cookie_headers(&session)?;

    tracing::info!("User logged in successfully: {} ({})", user.name, user.id);

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie), (SET_COOKIE, csrf_cookie)]),
        Json(LoginResponse {
            token: issued.plain_text,
            user: UserResponse::from(&user),
            message: "Login successful".to_string(),
        }),
    )
        .into_response())
}
