//! Store contracts consumed by the realtime core.
//!
//! The conversation and notification stores are external collaborators:
//! the core calls them through these traits and never reimplements their
//! persistence. The sqlx repositories in [`crate::repositories`] are the
//! production implementations; tests use in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use staylink_core::result::AppResult;
use staylink_core::types::{ConversationId, MessageId, NotificationId, UserId};
use staylink_entity::conversation::Conversation;
use staylink_entity::device::{BotLink, PushToken};
use staylink_entity::message::Message;
use staylink_entity::notification::{NewNotification, Notification, NotificationSetting};

/// Conversation and message persistence.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Find a live (non-deleted) conversation by id.
    async fn find_conversation(&self, id: ConversationId) -> AppResult<Option<Conversation>>;

    /// Persist a new message and return the stored row.
    async fn create_message(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        text: &str,
    ) -> AppResult<Message>;

    /// Fetch the listed messages, restricted to the given conversation.
    ///
    /// Ids outside the conversation are simply absent from the result.
    async fn find_messages(
        &self,
        conversation_id: ConversationId,
        ids: &[MessageId],
    ) -> AppResult<Vec<Message>>;

    /// The most recent message of a conversation, if any.
    async fn last_message(&self, conversation_id: ConversationId) -> AppResult<Option<Message>>;

    /// Count messages addressed to `recipient` with `is_read = false`.
    async fn unread_count(
        &self,
        conversation_id: ConversationId,
        recipient: UserId,
    ) -> AppResult<i64>;

    /// Ids of all unread messages addressed to `recipient`.
    async fn unread_message_ids(
        &self,
        conversation_id: ConversationId,
        recipient: UserId,
    ) -> AppResult<Vec<MessageId>>;

    /// Set `is_read = true, read_at = read_at` on the listed messages.
    async fn mark_read(&self, ids: &[MessageId], read_at: DateTime<Utc>) -> AppResult<u64>;

    /// Replace a message's text, touching `updated_at` only.
    async fn update_message_text(&self, id: MessageId, text: &str) -> AppResult<Message>;

    /// Hard-delete the listed messages.
    async fn delete_messages(&self, ids: &[MessageId]) -> AppResult<u64>;

    /// Update a conversation's `last_message_at`.
    async fn touch_last_message_at(
        &self,
        conversation_id: ConversationId,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// Notification rows, per-user settings, and delivery endpoints.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Record one dispatch attempt.
    async fn create_notification(&self, notification: NewNotification) -> AppResult<Notification>;

    /// The user's channel toggles, if they ever saved any.
    async fn get_settings(&self, user_id: UserId) -> AppResult<Option<NotificationSetting>>;

    /// All push tokens registered by the user.
    async fn push_tokens(&self, user_id: UserId) -> AppResult<Vec<PushToken>>;

    /// Remove tokens the provider reported as invalid.
    async fn delete_push_tokens(&self, tokens: &[String]) -> AppResult<u64>;

    /// The user's linked bot-relay chat, if any.
    async fn bot_link(&self, user_id: UserId) -> AppResult<Option<BotLink>>;

    /// Count unread notification rows for a user.
    async fn unread_notification_count(&self, user_id: UserId) -> AppResult<i64>;

    /// Mark one notification row as read.
    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<()>;
}

/// Durable last-seen bookkeeping for the presence tracker.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Persist a last-seen timestamp. Implementations must keep the stored
    /// value monotonically non-decreasing.
    async fn persist_last_seen(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()>;

    /// The stored last-seen timestamp, if the user was ever seen.
    async fn last_seen(&self, user_id: UserId) -> AppResult<Option<DateTime<Utc>>>;
}
