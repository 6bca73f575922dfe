//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use staylink_core::error::{AppError, ErrorKind};
use staylink_core::result::AppResult;
use staylink_core::types::{NotificationId, UserId};
use staylink_entity::device::{BotLink, PushToken};
use staylink_entity::notification::{NewNotification, Notification, NotificationSetting};

use crate::store::NotificationStore;

/// sqlx-backed implementation of [`NotificationStore`].
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create_notification(&self, notification: NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, user_id, event_type, channel, reference_id, title, body, payload, is_read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, NOW()) RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(notification.user_id)
        .bind(&notification.event_type)
        .bind(notification.channel)
        .bind(notification.reference_id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn get_settings(&self, user_id: UserId) -> AppResult<Option<NotificationSetting>> {
        sqlx::query_as::<_, NotificationSetting>(
            "SELECT * FROM notification_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get settings", e))
    }

    async fn push_tokens(&self, user_id: UserId) -> AppResult<Vec<PushToken>> {
        sqlx::query_as::<_, PushToken>(
            "SELECT * FROM push_tokens WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list push tokens", e))
    }

    async fn delete_push_tokens(&self, tokens: &[String]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM push_tokens WHERE token = ANY($1)")
            .bind(tokens)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete push tokens", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn bot_link(&self, user_id: UserId) -> AppResult<Option<BotLink>> {
        sqlx::query_as::<_, BotLink>("SELECT * FROM bot_links WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get bot link", e))
    }

    async fn unread_notification_count(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }
}
