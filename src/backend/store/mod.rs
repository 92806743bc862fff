//! Persistence Backends
//!
//! Implementations of `UserStore` and `NotificationStore`.
//!
//! - **`postgres`** - `PgStore`, used when `DATABASE_URL` is configured
//! - **`memory`** - `MemoryStore`, used without a database and by the tests

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::backend::auth::policy::Role;
use crate::backend::auth::users::{hash_password, NewUser, UserStore};
use crate::backend::notifications::models::{NewNotification, NotificationStore};
use crate::shared::SeedConfig;

/// In-memory store
pub mod memory;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database query failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed while seeding
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Unique constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Create the configured seed users and notifications.
///
/// Users whose email already exists are left untouched. Notifications
/// addressed to an unknown email are skipped.
pub async fn seed(
    users: &dyn UserStore,
    notifications: &dyn NotificationStore,
    seed: &SeedConfig,
    bcrypt_cost: u32,
) -> Result<(), StoreError> {
    for entry in &seed.users {
        if users.find_by_email(&entry.email).await?.is_some() {
            tracing::debug!("Seed user {} already exists", entry.email);
            continue;
        }

        users
            .create_user(NewUser {
                name: entry.name.clone(),
                email: entry.email.clone(),
                password_hash: hash_password(&entry.password, bcrypt_cost)?,
                roles: entry.roles.iter().map(|r| Role::from_label(r)).collect(),
            })
            .await?;
        tracing::info!("Seeded user {}", entry.email);
    }

    for entry in &seed.notifications {
        let Some(owner) = users.find_by_email(&entry.email).await? else {
            tracing::warn!("Skipping seed notification for unknown user {}", entry.email);
            continue;
        };

        let now = Utc::now();
        notifications
            .create_notification(NewNotification {
                notifiable_id: owner.id,
                kind: entry.kind.clone(),
                data: json!({
                    "message": entry.message,
                    "created_at": now.format("%Y-%m-%d %H:%M:%S").to_string(),
                }),
                read_at: entry.read.then_some(now),
            })
            .await?;
    }

    if !seed.notifications.is_empty() {
        tracing::info!("Seeded {} notifications", seed.notifications.len());
    }

    Ok(())
}
