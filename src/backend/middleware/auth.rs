/**
 * Principal Resolution Middleware
 *
 * This module resolves who is making a request. It runs on every route and
 * never rejects a request on its own; handlers decide whether a principal is
 * required.
 *
 * # Resolution order
 *
 * 1. `Authorization: Bearer <id>|<secret>` naming a live access token
 * 2. The session cookie naming a live session bound to a user
 * 3. No principal
 *
 * The resolved `Principal` is attached to the request extensions and read
 * back by the `CurrentUser` extractor.
 */

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::session_id_from_headers;
use crate::backend::auth::tokens::authenticate_token;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// How the principal authenticated
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMethod {
    /// Bearer access token with this ID
    Token(Uuid),
    /// Session cookie with this session ID
    Session(String),
}

/// Authenticated user of the current request
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub method: AuthMethod,
}

/// Middleware attaching the request's `Principal`, if any.
///
/// Store failures during resolution answer 500.
pub async fn resolve_principal(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match principal_from_headers(&app_state, request.headers()).await {
        Ok(Some(principal)) => {
            tracing::debug!(
                "Resolved principal {} via {:?}",
                principal.user.id,
                principal.method
            );
            request.extensions_mut().insert(principal);
        }
        Ok(None) => {}
        Err(e) => {
            return app_state
                .config
                .error_policy
                .render(e, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    next.run(request).await
}

async fn principal_from_headers(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Principal>, BackendError> {
    if let Some(bearer) = bearer_token(headers) {
        if let Some((user, token)) = authenticate_token(app_state.users.as_ref(), bearer).await? {
            return Ok(Some(Principal {
                user,
                method: AuthMethod::Token(token.id),
            }));
        }
    }

    let Some(session_id) = session_id_from_headers(headers, app_state.sessions.cookie_name()) else {
        return Ok(None);
    };
    let Some(session) = app_state.sessions.load(&session_id).await else {
        return Ok(None);
    };
    let Some(user_id) = session.data.user_id else {
        return Ok(None);
    };

    match app_state.users.find_by_id(user_id).await? {
        Some(user) => Ok(Some(Principal {
            user,
            method: AuthMethod::Session(session.id),
        })),
        None => {
            tracing::warn!("Session bound to missing user {}", user_id);
            Ok(None)
        }
    }
}

/// Extract the token from an `Authorization: Bearer` header.
///
/// The scheme is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Axum extractor for the current principal
///
/// Never rejects; `None` means the request is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Principal>().cloned()))
    }
}
