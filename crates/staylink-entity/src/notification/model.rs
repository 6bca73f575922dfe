//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staylink_core::types::{NotificationId, UserId};

use super::channel::NotificationChannel;

/// A durable record of one dispatch attempt.
///
/// Created once per event per recipient; never mutated except `is_read`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Event type that triggered this notification.
    pub event_type: String,
    /// Channel the notification was delivered over.
    pub channel: NotificationChannel,
    /// Identifier of the referenced domain object, if any.
    pub reference_id: Option<Uuid>,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Additional structured data (JSON).
    pub payload: Option<serde_json::Value>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Parameters for recording a new notification row.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: UserId,
    /// Event type that triggered this notification.
    pub event_type: String,
    /// Channel used for delivery.
    pub channel: NotificationChannel,
    /// Identifier of the referenced domain object, if any.
    pub reference_id: Option<Uuid>,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Additional structured data (JSON).
    pub payload: Option<serde_json::Value>,
}
