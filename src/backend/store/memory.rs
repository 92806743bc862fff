/**
 * In-Memory Store
 *
 * `MemoryStore` keeps users, tokens and notifications in a single
 * `Arc<RwLock<..>>`. It backs the server when no database is configured and
 * is the store used by the test suite.
 *
 * Clones share the same data.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::tokens::{AccessToken, NewAccessToken};
use crate::backend::auth::users::{NewUser, User, UserStore};
use crate::backend::notifications::models::{NewNotification, Notification, NotificationStore};
use crate::backend::store::StoreError;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    tokens: HashMap<Uuid, AccessToken>,
    /// Insertion order
    notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens currently stored for a user
    pub async fn token_count(&self, user_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner.tokens.values().filter(|t| t.user_id == user_id).count()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
            roles: user.roles,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn create_token(&self, token: NewAccessToken) -> Result<AccessToken, StoreError> {
        let now = Utc::now();
        let token = AccessToken {
            id: token.id,
            user_id: token.user_id,
            name: token.name,
            token_hash: token.token_hash,
            abilities: token.abilities,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .tokens
            .insert(token.id, token.clone());

        Ok(token)
    }

    async fn find_token(&self, id: Uuid) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.inner.read().await.tokens.get(&id).cloned())
    }

    async fn touch_token(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(token) = self.inner.write().await.tokens.get_mut(&id) {
            token.last_used_at = Some(at);
            token.updated_at = at;
        }
        Ok(())
    }

    async fn delete_tokens_for(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.tokens.len();
        inner.tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - inner.tokens.len()) as u64)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn notifications_for(&self, owner: Uuid) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        // Newest insertion first among equal timestamps
        let mut owned: Vec<Notification> = inner
            .notifications
            .iter()
            .rev()
            .filter(|n| n.notifiable_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_for(&self, owner: Uuid, id: Uuid) -> Result<Option<Notification>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .find(|n| n.id == id && n.notifiable_id == owner)
            .cloned())
    }

    async fn mark_read(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let target = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.notifiable_id == owner && n.read_at.is_none());

        Ok(match target {
            Some(notification) => {
                notification.read_at = Some(at);
                notification.updated_at = at;
                true
            }
            None => false,
        })
    }

    async fn mark_all_read(&self, owner: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let mut updated = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.notifiable_id == owner && n.read_at.is_none())
        {
            notification.read_at = Some(at);
            notification.updated_at = at;
            updated += 1;
        }
        Ok(updated)
    }

    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            notifiable_id: notification.notifiable_id,
            kind: notification.kind,
            data: notification.data,
            read_at: notification.read_at,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .notifications
            .push(notification.clone());

        Ok(notification)
    }
}
