//! Chat message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staylink_core::types::{ConversationId, MessageId, UserId};

/// A single chat message.
///
/// Invariant: `read_at` is set iff `is_read` is true. Edits update
/// `updated_at` only, never `sent_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// The user who sent the message.
    pub sender_id: UserId,
    /// Message text.
    pub text: String,
    /// Whether the addressee has read the message.
    pub is_read: bool,
    /// When the addressee read the message.
    pub read_at: Option<DateTime<Utc>>,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
    /// When the message text was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Whether this message is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Whether this message is addressed to (not sent by) the given user.
    pub fn addressed_to(&self, user_id: UserId) -> bool {
        self.sender_id != user_id
    }
}
