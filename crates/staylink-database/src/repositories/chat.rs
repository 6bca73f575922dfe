//! Conversation and message repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use staylink_core::error::{AppError, ErrorKind};
use staylink_core::result::AppResult;
use staylink_core::types::{ConversationId, MessageId, UserId};
use staylink_entity::conversation::Conversation;
use staylink_entity::message::Message;

use crate::store::ChatStore;

/// sqlx-backed implementation of [`ChatStore`].
#[derive(Debug, Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    /// Create a new chat repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn as_uuids(ids: &[MessageId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.0).collect()
}

#[async_trait]
impl ChatStore for ChatRepository {
    async fn find_conversation(&self, id: ConversationId) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find conversation", e))
    }

    async fn create_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        text: &str,
    ) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, conversation_id, sender_id, text, is_read, sent_at, updated_at) \
             VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW()) RETURNING *",
        )
        .bind(MessageId::new())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create message", e))
    }

    async fn find_messages(
        &self,
        conversation_id: ConversationId,
        ids: &[MessageId],
    ) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 AND id = ANY($2)",
        )
        .bind(conversation_id)
        .bind(as_uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find messages", e))
    }

    async fn last_message(&self, conversation_id: ConversationId) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY sent_at DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load last message", e))
    }

    async fn unread_count(
        &self,
        conversation_id: ConversationId,
        recipient: UserId,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(recipient)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn unread_message_ids(
        &self,
        conversation_id: ConversationId,
        recipient: UserId,
    ) -> AppResult<Vec<MessageId>> {
        sqlx::query_scalar(
            "SELECT id FROM messages \
             WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE \
             ORDER BY sent_at",
        )
        .bind(conversation_id)
        .bind(recipient)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list unread ids", e))
    }

    async fn mark_read(&self, ids: &[MessageId], read_at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = $2 WHERE id = ANY($1) AND is_read = FALSE",
        )
        .bind(as_uuids(ids))
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    async fn update_message_text(&self, id: MessageId, text: &str) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "UPDATE messages SET text = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update message", e))?
        .ok_or_else(|| AppError::not_found(format!("Message {id} not found")))
    }

    async fn delete_messages(&self, ids: &[MessageId]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ANY($1)")
            .bind(as_uuids(ids))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete messages", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn touch_last_message_at(
        &self,
        conversation_id: ConversationId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to touch conversation", e)
            })?;
        Ok(())
    }
}
