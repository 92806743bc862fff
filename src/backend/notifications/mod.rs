//! Notifications Module
//!
//! The administrator notification inbox.
//!
//! - **`models`** - Stored record, payload schema, listing projection and the
//!   `NotificationStore` trait
//! - **`handlers`** - HTTP handlers (index, mark one read, mark all read)

/// Notification records and store trait
pub mod models;

/// HTTP handlers
pub mod handlers;

pub use handlers::{index, mark_all_as_read, mark_as_read};
pub use models::{Notification, NotificationData, NotificationIndex, NotificationStore, NotificationView};
