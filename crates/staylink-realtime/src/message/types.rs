//! Inbound and outbound realtime event definitions.
//!
//! Every client event receives exactly one [`Ack`]; broadcasts to other
//! sessions in a room use the bare event name, not the ack envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staylink_core::error::AppError;
use staylink_core::types::{ConversationId, MessageId, NotificationId, UserId};
use staylink_entity::message::Message;

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Join a conversation room.
    #[serde(rename = "chat:join")]
    ChatJoin {
        /// Conversation to join.
        conversation_id: ConversationId,
    },
    /// Leave a conversation room.
    #[serde(rename = "chat:leave")]
    ChatLeave {
        /// Conversation to leave.
        conversation_id: ConversationId,
    },
    /// Send a message.
    #[serde(rename = "message:send")]
    MessageSend {
        /// Target conversation.
        conversation_id: ConversationId,
        /// Message text.
        text: String,
    },
    /// Mark messages as read.
    #[serde(rename = "message:read")]
    MessageRead {
        /// Target conversation.
        conversation_id: ConversationId,
        /// Specific ids to mark; omitted means all unread addressed to the caller.
        #[serde(default)]
        message_ids: Option<Vec<MessageId>>,
    },
    /// Edit a message.
    #[serde(rename = "message:edit")]
    MessageEdit {
        /// The message to edit.
        message_id: MessageId,
        /// Conversation the message belongs to.
        conversation_id: ConversationId,
        /// Replacement text.
        new_text: String,
    },
    /// Delete messages.
    #[serde(rename = "message:delete")]
    MessageDelete {
        /// Conversation the messages belong to.
        conversation_id: ConversationId,
        /// Ids to delete.
        message_ids: Vec<MessageId>,
    },
    /// Subscribe to another user's presence.
    #[serde(rename = "user:status:subscribe")]
    UserStatusSubscribe {
        /// The user to watch.
        user_id: UserId,
    },
    /// Unsubscribe from a user's presence.
    #[serde(rename = "user:status:unsubscribe")]
    UserStatusUnsubscribe {
        /// The user to stop watching.
        user_id: UserId,
    },
    /// Mark a notification row as read.
    #[serde(rename = "notification:read")]
    NotificationRead {
        /// The notification to mark.
        notification_id: NotificationId,
    },
}

/// Events sent by the server to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// A new message arrived in a joined conversation.
    #[serde(rename = "message:new")]
    MessageNew {
        /// The persisted message.
        message: Message,
    },
    /// Messages were marked read.
    #[serde(rename = "message:read-update")]
    MessageReadUpdate {
        /// The conversation.
        conversation_id: ConversationId,
        /// The reader.
        user_id: UserId,
        /// The ids that changed.
        message_ids: Vec<MessageId>,
    },
    /// A message's text changed.
    #[serde(rename = "message:edited")]
    MessageEdited {
        /// The updated message.
        message: Message,
    },
    /// Messages were deleted.
    #[serde(rename = "message:deleted")]
    MessageDeleted {
        /// The conversation.
        conversation_id: ConversationId,
        /// The ids that were removed.
        message_ids: Vec<MessageId>,
    },
    /// The conversation's "last message" projection changed.
    #[serde(rename = "last-message")]
    LastMessage {
        /// The conversation.
        conversation_id: ConversationId,
        /// The current latest message, if any remain.
        message: Option<Message>,
    },
    /// A recipient's unread count changed.
    #[serde(rename = "unreads")]
    Unreads {
        /// The conversation.
        conversation_id: ConversationId,
        /// The user the count applies to.
        user_id: UserId,
        /// Store-derived unread count.
        count: i64,
    },
    /// A watched user's presence changed.
    #[serde(rename = "user:status")]
    UserStatus {
        /// The user.
        user_id: UserId,
        /// Whether any session is open.
        is_online: bool,
        /// Last transition timestamp.
        last_seen_at: DateTime<Utc>,
    },
    /// A realtime-channel notification.
    #[serde(rename = "notification")]
    Notification {
        /// Notification row id.
        id: NotificationId,
        /// The triggering event type.
        event_type: String,
        /// Rendered title.
        title: String,
        /// Rendered body.
        body: String,
        /// Referenced domain object, if any.
        reference_id: Option<Uuid>,
        /// Structured payload.
        payload: Option<serde_json::Value>,
        /// When the row was recorded.
        created_at: DateTime<Utc>,
    },
    /// A rejected operation, delivered only to the caller.
    #[serde(rename = "error")]
    Error(ErrorBody),
}

/// Client-facing error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Error category name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Numeric code.
    pub code: u16,
    /// When the error was produced.
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    /// Build the envelope for an application error.
    ///
    /// Internal detail is kept out of the envelope; callers log the full
    /// error before converting.
    pub fn from_error(err: &AppError) -> Self {
        use staylink_core::error::ErrorKind;
        let message = match err.kind {
            ErrorKind::Database | ErrorKind::Internal | ErrorKind::Serialization => {
                "Internal error".to_string()
            }
            _ => err.message.clone(),
        };
        Self {
            kind: err.kind.to_string(),
            message,
            code: err.kind.code(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-request acknowledgement envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error envelope on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Ack {
    /// Successful ack with a data payload.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful ack with no payload.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// Failed ack carrying the error envelope.
    pub fn err(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody::from_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_use_colon_separated_names() {
        let raw = r#"{"event":"chat:join","conversationId":"7f2c1af0-0d5e-4f3a-9d55-3d2a4d9ddc10"}"#;
        let parsed: ClientEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(parsed, ClientEvent::ChatJoin { .. }));
    }

    #[test]
    fn message_read_ids_default_to_none() {
        let raw = r#"{"event":"message:read","conversationId":"7f2c1af0-0d5e-4f3a-9d55-3d2a4d9ddc10"}"#;
        let parsed: ClientEvent = serde_json::from_str(raw).unwrap();
        match parsed {
            ClientEvent::MessageRead { message_ids, .. } => assert!(message_ids.is_none()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn ack_omits_absent_fields() {
        let json = serde_json::to_string(&Ack::ok_empty()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn error_envelope_hides_internal_detail() {
        let err = AppError::database("connection pool exhausted on shard 3");
        let body = ErrorBody::from_error(&err);
        assert_eq!(body.kind, "DATABASE");
        assert_eq!(body.message, "Internal error");
    }

    #[test]
    fn error_envelope_keeps_domain_detail() {
        let err = AppError::access_denied("Not a participant");
        let body = ErrorBody::from_error(&err);
        assert_eq!(body.kind, "ACCESS_DENIED");
        assert_eq!(body.message, "Not a participant");
        assert_eq!(body.code, 403);
    }
}
