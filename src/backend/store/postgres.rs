//! PostgreSQL store
//!
//! `PgStore` implements both store traits on one connection pool. Tables are
//! created by the embedded migrations (see `server::config::load_database`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::policy::Role;
use crate::backend::auth::tokens::{AccessToken, NewAccessToken};
use crate::backend::auth::users::{NewUser, User, UserStore};
use crate::backend::notifications::models::{NewNotification, Notification, NotificationStore};
use crate::backend::store::StoreError;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach the user's roles, which `FromRow` skips
    async fn with_roles(&self, mut user: User) -> Result<User, sqlx::Error> {
        let labels = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role
            FROM user_roles
            WHERE user_id = $1
            ORDER BY role
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        user.roles = labels.iter().map(|label| Role::from_label(label)).collect();
        Ok(user)
    }
}

fn map_unique_violation(error: sqlx::Error, what: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{} already exists", what))
        }
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, email_verified_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => Ok(Some(self.with_roles(user).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, email_verified_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => Ok(Some(self.with_roles(user).await?)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, email_verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, $5, $5)
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &format!("user {}", user.email)))?;

        for role in &user.roles {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(role.label())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
            roles: user.roles,
        })
    }

    async fn create_token(&self, token: NewAccessToken) -> Result<AccessToken, StoreError> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO personal_access_tokens (id, user_id, name, token_hash, abilities, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, user_id, name, token_hash, abilities, last_used_at, created_at, updated_at
            "#,
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.name)
        .bind(&token.token_hash)
        .bind(Json(&token.abilities))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "token"))?;

        Ok(token)
    }

    async fn find_token(&self, id: Uuid) -> Result<Option<AccessToken>, StoreError> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, user_id, name, token_hash, abilities, last_used_at, created_at, updated_at
            FROM personal_access_tokens
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn touch_token(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE personal_access_tokens
            SET last_used_at = $1, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_tokens_for(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM personal_access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn notifications_for(&self, owner: Uuid) -> Result<Vec<Notification>, StoreError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, notifiable_id, type, data, read_at, created_at, updated_at
            FROM notifications
            WHERE notifiable_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn find_for(&self, owner: Uuid, id: Uuid) -> Result<Option<Notification>, StoreError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, notifiable_id, type, data, read_at, created_at, updated_at
            FROM notifications
            WHERE id = $1 AND notifiable_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn mark_read(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read_at = $1, updated_at = $1
            WHERE id = $2 AND notifiable_id = $3 AND read_at IS NULL
            "#,
        )
        .bind(at)
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, owner: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read_at = $1, updated_at = $1
            WHERE notifiable_id = $2 AND read_at IS NULL
            "#,
        )
        .bind(at)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let created = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, notifiable_id, type, data, read_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, notifiable_id, type, data, read_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.notifiable_id)
        .bind(&notification.kind)
        .bind(&notification.data)
        .bind(notification.read_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
