/**
 * User Model and Store Interface
 *
 * This module defines the user record, the `UserStore` collaborator that
 * owns users and their bearer tokens, and password hashing helpers.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::backend::auth::policy::Role;
use crate::backend::auth::tokens::{AccessToken, NewAccessToken};
use crate::backend::store::StoreError;

/// User with its roles loaded
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the email address was verified
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
    /// Role labels attached to the user, loaded from `user_roles`
    #[sqlx(skip)]
    pub roles: Vec<Role>,
}

impl User {
    /// Check a plain-text password against the stored bcrypt hash
    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(password, &self.password_hash)
    }
}

/// Data needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Persistence collaborator for users and their access tokens
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Get user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Create a new user with roles
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Persist a newly issued access token
    async fn create_token(&self, token: NewAccessToken) -> Result<AccessToken, StoreError>;

    /// Get access token by ID
    async fn find_token(&self, id: Uuid) -> Result<Option<AccessToken>, StoreError>;

    /// Record that a token was just used
    async fn touch_token(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Delete every token of a user, returning how many were deleted
    async fn delete_tokens_for(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
