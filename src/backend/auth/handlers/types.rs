/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication handlers.
 * These types are shared across the login, logout and view handlers.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::backend::auth::policy::Role;
use crate::backend::auth::users::User;
use crate::shared::validation::Validator;
use crate::shared::ValidationErrors;

/// Login request
///
/// Fields are kept as raw JSON values so that missing, `null` or mistyped
/// fields are reported as validation errors.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

impl LoginRequest {
    /// Validate the request, returning the email and password
    pub fn validate(&self) -> Result<(&str, &str), ValidationErrors> {
        let mut validator = Validator::new();
        let email = validator.email("email", self.email.as_ref());
        let password = validator.string("password", self.password.as_ref());
        validator.finish()?;

        Ok((email.unwrap_or_default(), password.unwrap_or_default()))
    }
}

/// User resource (without sensitive data)
///
/// Contains user information that is safe to return to clients.
/// Does not include password hash or other sensitive information.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Role labels
    pub roles: Vec<Role>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
            roles: user.roles.clone(),
        }
    }
}

/// Login response
///
/// Contains the plain-text bearer token, which is only ever shown here.
#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub message: String,
}

/// Plain `{"message": ..}` body
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
