/**
 * Backend Error Types
 *
 * This module defines the error kinds produced by HTTP handlers. Each
 * variant corresponds to one failure class, and the mapping from kind to
 * HTTP status lives here rather than in the handlers.
 *
 * # Error Categories
 *
 * ## Request errors
 * - `Validation` - one or more input fields failed validation
 * - `InvalidCredentials` - unknown email or wrong password
 *
 * ## Access errors
 * - `Unauthenticated` - no principal on an endpoint that needs one
 * - `Forbidden` - principal lacks the required permission
 *
 * ## Lookup errors
 * - `NotFound` - the addressed record does not exist for this principal
 *
 * ## Server errors
 * - `Store` - persistence failure
 * - `MalformedPayload` - a stored notification payload does not match its schema
 * - `Internal` - anything else (randomness, header encoding, hashing)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::ValidationErrors;

/// Message returned to clients in place of server-side error details
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Coarse classification of a `BackendError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    NotFound,
    Server,
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use masagena::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("No query results for notification [42]");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Input validation failed
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Unknown email or password mismatch
    #[error("The provided credentials are incorrect.")]
    InvalidCredentials,

    /// The endpoint needs an authenticated principal
    #[error("{message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// The principal may not perform this operation
    #[error("Unauthorized")]
    Forbidden,

    /// The addressed record does not exist (for this principal)
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored notification payload lacks a required key
    #[error("Malformed payload for notification {id}: {reason}")]
    MalformedPayload {
        /// Notification ID
        id: String,
        /// Decoder message
        reason: String,
    },

    /// Any other server-side failure
    #[error("{message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    /// Create an unauthenticated error with a client-facing message
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Store(_)
            | Self::MalformedPayload { .. }
            | Self::Internal { .. } => ErrorKind::Server,
        }
    }

    /// Whether this error is an explicit access branch.
    ///
    /// Explicit branches keep their status and `{"message"}` body under every
    /// error policy.
    pub fn is_explicit(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthenticated | ErrorKind::Forbidden)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 422 Unprocessable Entity
    /// - `InvalidCredentials` - 401 Unauthorized
    /// - `Unauthenticated` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::InvalidCredentials | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    ///
    /// Server-side errors are replaced with a generic message.
    pub fn message(&self) -> String {
        match self.kind() {
            ErrorKind::Server => SERVER_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<ValidationErrors> for BackendError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<getrandom::Error> for BackendError {
    fn from(err: getrandom::Error) -> Self {
        Self::internal(format!("Random number generator failed: {}", err))
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("Password verification failed: {}", err))
    }
}

impl From<axum::http::header::InvalidHeaderValue> for BackendError {
    fn from(err: axum::http::header::InvalidHeaderValue) -> Self {
        Self::internal(format!("Invalid header value: {}", err))
    }
}
