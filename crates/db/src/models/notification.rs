//! Notification entity model and DTOs.

use habitforge_core::notifications::{NotificationKind, Priority};
use habitforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub priority: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub scheduled_for: Option<Timestamp>,
    pub action_url: Option<String>,
    pub dedup_key: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: NotificationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub scheduled_for: Option<Timestamp>,
    /// At most one notification per `(user_id, dedup_key)` is stored.
    pub dedup_key: Option<String>,
}
