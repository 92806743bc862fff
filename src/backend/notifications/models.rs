/**
 * Notification Models
 *
 * This module defines the stored notification record, its payload schema,
 * the projection returned by the inbox endpoint, and the `NotificationStore`
 * collaborator.
 *
 * # Payload
 *
 * The `data` column holds JSON of the shape
 *
 * ```json
 * { "message": "New order placed", "created_at": "2 minutes ago", "order_id": 7 }
 * ```
 *
 * `message` and `created_at` are required; any other keys are kept in
 * `NotificationData::extra`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::store::StoreError;

/// Type tag used for admin notifications
pub const ADMIN_NOTIFICATION_TYPE: &str = "App\\Notifications\\AdminNotification";

/// Stored notification
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    /// Owning user
    pub notifiable_id: Uuid,
    /// Type tag
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Raw JSON payload
    pub data: Value,
    /// Null while unread
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Decode the payload, failing when a required key is missing
    pub fn payload(&self) -> Result<NotificationData, BackendError> {
        serde_json::from_value(self.data.clone()).map_err(|e| BackendError::MalformedPayload {
            id: self.id.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Notification payload schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub message: String,
    /// Display string for the creation time, written by the producer
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data needed to create a notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub notifiable_id: Uuid,
    pub kind: String,
    pub data: Value,
    pub read_at: Option<DateTime<Utc>>,
}

/// One entry of the inbox listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub message: String,
    pub created_at_message: String,
    pub read_at: Option<DateTime<Utc>>,
    /// `1` when read, `0` otherwise
    pub is_read: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Notification> for NotificationView {
    type Error = BackendError;

    fn try_from(notification: &Notification) -> Result<Self, Self::Error> {
        let payload = notification.payload()?;
        Ok(Self {
            id: notification.id,
            message: payload.message,
            created_at_message: payload.created_at,
            read_at: notification.read_at,
            is_read: u8::from(notification.is_read()),
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        })
    }
}

/// Inbox listing with read counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationIndex {
    pub data: Vec<NotificationView>,
    /// Number of read notifications
    pub readed: usize,
    pub unread: usize,
    pub count: usize,
}

impl NotificationIndex {
    /// Project notifications into the listing, keeping their order
    pub fn build(notifications: &[Notification]) -> Result<Self, BackendError> {
        let data = notifications
            .iter()
            .map(NotificationView::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let readed = notifications.iter().filter(|n| n.is_read()).count();

        Ok(Self {
            readed,
            unread: notifications.len() - readed,
            count: notifications.len(),
            data,
        })
    }
}

/// Persistence collaborator for notifications
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// All notifications of a user, newest first
    async fn notifications_for(&self, owner: Uuid) -> Result<Vec<Notification>, StoreError>;

    /// A single notification, only if it belongs to `owner`
    async fn find_for(&self, owner: Uuid, id: Uuid) -> Result<Option<Notification>, StoreError>;

    /// Set `read_at` on an unread notification of `owner`.
    ///
    /// Returns whether a row was updated.
    async fn mark_read(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Mark every unread notification of `owner` read, returning the count
    async fn mark_all_read(&self, owner: Uuid, at: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError>;
}
