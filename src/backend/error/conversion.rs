/**
 * Error Conversion
 *
 * This module turns backend errors into HTTP responses.
 *
 * # Strict rendering (`IntoResponse`)
 *
 * ```json
 * { "message": "The provided credentials are incorrect." }
 * ```
 *
 * Validation errors additionally carry the per-field messages:
 *
 * ```json
 * {
 *   "message": "The email field is required. (and 1 more error)",
 *   "errors": { "email": ["The email field is required."], "password": ["..."] }
 * }
 * ```
 *
 * # Compat rendering (`ErrorPolicy::Compat`)
 *
 * Everything except the explicit access branches collapses into the
 * endpoint's catch-all status with the raw error text:
 *
 * ```json
 * { "msg": "The provided credentials are incorrect." }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::backend::error::types::{BackendError, ErrorKind};
use crate::shared::ErrorPolicy;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            BackendError::Validation(errors) => json!({
                "message": errors.summary(),
                "errors": errors.by_field(),
            }),
            _ => json!({ "message": self.message() }),
        };

        (status, Json(body)).into_response()
    }
}

impl ErrorPolicy {
    /// Render a handler error.
    ///
    /// `catch_all` is the status the endpoint answers with under the compat
    /// policy for errors that are not explicit access branches.
    pub fn render(self, error: BackendError, catch_all: StatusCode) -> Response {
        log_error(&error);

        match self {
            ErrorPolicy::Strict => error.into_response(),
            ErrorPolicy::Compat if error.is_explicit() => error.into_response(),
            ErrorPolicy::Compat => {
                (catch_all, Json(json!({ "msg": error.to_string() }))).into_response()
            }
        }
    }
}

fn log_error(error: &BackendError) {
    match error.kind() {
        ErrorKind::Server => tracing::error!("Request failed: {}", error),
        ErrorKind::Validation => tracing::debug!("Validation failed: {}", error),
        _ => tracing::warn!("Request rejected: {}", error),
    }
}
