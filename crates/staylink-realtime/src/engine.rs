//! Realtime engine — the single entry point the transport layer talks to.
//!
//! The WebSocket handler owns the socket; the engine owns everything
//! behind it: session lifecycle (including the per-user session cap),
//! presence transitions, and routing of parsed client events to the chat
//! coordinator and notification store. Every inbound frame is answered
//! with exactly one ack.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use staylink_core::config::RealtimeConfig;
use staylink_core::error::AppError;
use staylink_core::result::AppResult;
use staylink_core::traits::VerifiedToken;
use staylink_core::types::SessionId;
use staylink_database::NotificationStore;

use crate::chat::ChatCoordinator;
use crate::connection::handle::SessionHandle;
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::{Ack, ClientEvent};
use crate::presence::PresenceTracker;
use crate::room::{Room, RoomBroadcaster};

/// Orchestrates sessions, presence, chat, and notification reads.
pub struct RealtimeEngine {
    config: RealtimeConfig,
    registry: Arc<ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    coordinator: ChatCoordinator,
    broadcaster: Arc<RoomBroadcaster>,
    notifications: Arc<dyn NotificationStore>,
}

impl RealtimeEngine {
    /// Assemble the engine from its collaborators.
    pub fn new(
        config: RealtimeConfig,
        registry: Arc<ConnectionRegistry>,
        presence: Arc<PresenceTracker>,
        coordinator: ChatCoordinator,
        broadcaster: Arc<RoomBroadcaster>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            config,
            registry,
            presence,
            coordinator,
            broadcaster,
            notifications,
        }
    }

    /// Open a session for an authenticated identity.
    ///
    /// The session is auto-joined to the user's own status room. When the
    /// per-user cap is exceeded the oldest session is evicted. The first
    /// session triggers the online presence broadcast.
    pub async fn connect(
        &self,
        identity: VerifiedToken,
    ) -> AppResult<(Arc<SessionHandle>, mpsc::Receiver<String>)> {
        let user_id = identity.user_id;
        let (handle, rx) = SessionHandle::new(
            user_id,
            identity.roles,
            self.config.channel_buffer_size,
        );
        let handle = Arc::new(handle);

        let first = self.registry.register(handle.clone());
        self.registry.join(handle.id, Room::UserStatus(user_id));

        // Enforce the cap after registering so the user never flickers
        // offline during a reconnect at the limit.
        let mut sessions = self.registry.sessions_for_user(user_id);
        while sessions.len() > self.config.max_sessions_per_user {
            let oldest = sessions.remove(0);
            info!(session_id = %oldest.id, user_id = %user_id, "Evicting oldest session over cap");
            if let Some((evicted, _)) = self.registry.unregister(oldest.id) {
                evicted.mark_closed();
            }
        }

        if first {
            match self.presence.set_online(user_id).await {
                Ok(event) => {
                    let _ = self
                        .broadcaster
                        .broadcast(Room::UserStatus(user_id), &event, None);
                }
                Err(e) => warn!(user_id = %user_id, error = %e, "Online transition failed"),
            }
        }

        info!(session_id = %handle.id, user_id = %user_id, "Session connected");
        Ok((handle, rx))
    }

    /// Close a session. Idempotent; the last session triggers the offline
    /// presence broadcast.
    pub async fn disconnect(&self, session_id: SessionId) {
        let Some((handle, last)) = self.registry.unregister(session_id) else {
            return;
        };
        handle.mark_closed();
        let user_id = handle.user_id;

        if last {
            match self.presence.set_offline(user_id).await {
                Ok(event) => {
                    let _ = self
                        .broadcaster
                        .broadcast(Room::UserStatus(user_id), &event, None);
                }
                Err(e) => warn!(user_id = %user_id, error = %e, "Offline transition failed"),
            }
        }

        info!(session_id = %session_id, user_id = %user_id, "Session disconnected");
    }

    /// Handle one inbound frame and return the serialized ack.
    pub async fn handle_frame(&self, handle: &Arc<SessionHandle>, raw: &str) -> String {
        self.presence.touch(handle.user_id);

        let ack = match serde_json::from_str::<ClientEvent>(raw) {
            Ok(event) => match self.dispatch_event(handle, event).await {
                Ok(ack) => ack,
                Err(e) => {
                    warn!(session_id = %handle.id, error = %e, "Client event rejected");
                    Ack::err(&e)
                }
            },
            Err(e) => {
                warn!(session_id = %handle.id, error = %e, "Malformed client frame");
                Ack::err(&AppError::validation("Malformed event"))
            }
        };

        serde_json::to_string(&ack)
            .unwrap_or_else(|_| r#"{"success":false}"#.to_string())
    }

    /// Close every live session, used during server shutdown.
    pub async fn shutdown(&self) {
        for handle in self.registry.all_sessions() {
            self.disconnect(handle.id).await;
        }
    }

    async fn dispatch_event(
        &self,
        handle: &Arc<SessionHandle>,
        event: ClientEvent,
    ) -> AppResult<Ack> {
        let caller = handle.user_id;
        let session_id = handle.id;

        let ack = match event {
            ClientEvent::ChatJoin { conversation_id } => {
                let joined = self
                    .coordinator
                    .join_conversation(session_id, caller, conversation_id)
                    .await?;
                Ack::ok(serde_json::to_value(joined)?)
            }
            ClientEvent::ChatLeave { conversation_id } => {
                self.coordinator.leave_conversation(session_id, conversation_id);
                Ack::ok_empty()
            }
            ClientEvent::MessageSend {
                conversation_id,
                text,
            } => {
                let message = self
                    .coordinator
                    .send_message(session_id, caller, conversation_id, &text)
                    .await?;
                Ack::ok(serde_json::to_value(message)?)
            }
            ClientEvent::MessageRead {
                conversation_id,
                message_ids,
            } => {
                let marked = self
                    .coordinator
                    .mark_as_read(session_id, caller, conversation_id, message_ids)
                    .await?;
                Ack::ok(json!({ "messageIds": marked }))
            }
            ClientEvent::MessageEdit {
                message_id,
                conversation_id,
                new_text,
            } => {
                let updated = self
                    .coordinator
                    .edit_message(session_id, caller, conversation_id, message_id, &new_text)
                    .await?;
                Ack::ok(serde_json::to_value(updated)?)
            }
            ClientEvent::MessageDelete {
                conversation_id,
                message_ids,
            } => {
                let deleted = self
                    .coordinator
                    .delete_messages(session_id, caller, conversation_id, message_ids)
                    .await?;
                Ack::ok(json!({ "deleted": deleted }))
            }
            ClientEvent::UserStatusSubscribe { user_id } => {
                self.registry.join(session_id, Room::UserStatus(user_id));
                let snapshot = self.presence.get_status(user_id).await;
                Ack::ok(serde_json::to_value(snapshot)?)
            }
            ClientEvent::UserStatusUnsubscribe { user_id } => {
                self.registry.leave(session_id, Room::UserStatus(user_id));
                Ack::ok_empty()
            }
            ClientEvent::NotificationRead { notification_id } => {
                self.notifications
                    .mark_notification_read(notification_id, caller)
                    .await?;
                let unread = self.notifications.unread_notification_count(caller).await?;
                Ack::ok(json!({ "unreadCount": unread }))
            }
        };
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    use staylink_core::types::{ConversationId, MessageId, NotificationId, UserId};
    use staylink_database::{ChatStore, PresenceStore};
    use staylink_entity::conversation::Conversation;
    use staylink_entity::device::{BotLink, PushToken};
    use staylink_entity::message::Message;
    use staylink_entity::notification::{
        NewNotification, Notification, NotificationChannel, NotificationSetting,
    };

    use crate::message::types::ServerEvent;
    use crate::message::validator::TextRules;

    struct EmptyChatStore;

    #[async_trait]
    impl ChatStore for EmptyChatStore {
        async fn find_conversation(
            &self,
            _id: ConversationId,
        ) -> AppResult<Option<Conversation>> {
            Ok(None)
        }

        async fn create_message(
            &self,
            _conversation_id: ConversationId,
            _sender_id: UserId,
            _text: &str,
        ) -> AppResult<Message> {
            Err(AppError::not_found("Conversation not found"))
        }

        async fn find_messages(
            &self,
            _conversation_id: ConversationId,
            _ids: &[MessageId],
        ) -> AppResult<Vec<Message>> {
            Ok(Vec::new())
        }

        async fn last_message(
            &self,
            _conversation_id: ConversationId,
        ) -> AppResult<Option<Message>> {
            Ok(None)
        }

        async fn unread_count(
            &self,
            _conversation_id: ConversationId,
            _recipient: UserId,
        ) -> AppResult<i64> {
            Ok(0)
        }

        async fn unread_message_ids(
            &self,
            _conversation_id: ConversationId,
            _recipient: UserId,
        ) -> AppResult<Vec<MessageId>> {
            Ok(Vec::new())
        }

        async fn mark_read(&self, _ids: &[MessageId], _read_at: DateTime<Utc>) -> AppResult<u64> {
            Ok(0)
        }

        async fn update_message_text(&self, _id: MessageId, _text: &str) -> AppResult<Message> {
            Err(AppError::not_found("Message not found"))
        }

        async fn delete_messages(&self, _ids: &[MessageId]) -> AppResult<u64> {
            Ok(0)
        }

        async fn touch_last_message_at(
            &self,
            _conversation_id: ConversationId,
            _at: DateTime<Utc>,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeNotificationStore {
        rows: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationStore for FakeNotificationStore {
        async fn create_notification(
            &self,
            notification: NewNotification,
        ) -> AppResult<Notification> {
            let row = Notification {
                id: NotificationId::new(),
                user_id: notification.user_id,
                event_type: notification.event_type,
                channel: notification.channel,
                reference_id: notification.reference_id,
                title: notification.title,
                body: notification.body,
                payload: notification.payload,
                is_read: false,
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn get_settings(&self, _user_id: UserId) -> AppResult<Option<NotificationSetting>> {
            Ok(None)
        }

        async fn push_tokens(&self, _user_id: UserId) -> AppResult<Vec<PushToken>> {
            Ok(Vec::new())
        }

        async fn delete_push_tokens(&self, _tokens: &[String]) -> AppResult<u64> {
            Ok(0)
        }

        async fn bot_link(&self, _user_id: UserId) -> AppResult<Option<BotLink>> {
            Ok(None)
        }

        async fn unread_notification_count(&self, user_id: UserId) -> AppResult<i64> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id && !r.is_read)
                .count() as i64)
        }

        async fn mark_notification_read(
            &self,
            notification_id: NotificationId,
            user_id: UserId,
        ) -> AppResult<()> {
            let mut rows = self.rows.lock().unwrap();
            match rows
                .iter_mut()
                .find(|r| r.id == notification_id && r.user_id == user_id)
            {
                Some(row) => {
                    row.is_read = true;
                    Ok(())
                }
                None => Err(AppError::not_found("Notification not found")),
            }
        }
    }

    struct NoopPresenceStore;

    #[async_trait]
    impl PresenceStore for NoopPresenceStore {
        async fn persist_last_seen(&self, _user_id: UserId, _at: DateTime<Utc>) -> AppResult<()> {
            Ok(())
        }

        async fn last_seen(&self, _user_id: UserId) -> AppResult<Option<DateTime<Utc>>> {
            Ok(None)
        }
    }

    fn engine_with(
        max_sessions: usize,
        notifications: Arc<FakeNotificationStore>,
    ) -> (Arc<ConnectionRegistry>, RealtimeEngine) {
        let registry = Arc::new(ConnectionRegistry::new());
        let presence = Arc::new(PresenceTracker::new(
            registry.clone(),
            Arc::new(NoopPresenceStore),
        ));
        let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone()));
        let coordinator = ChatCoordinator::new(
            Arc::new(EmptyChatStore),
            registry.clone(),
            broadcaster.clone(),
            TextRules::default(),
        );
        let config = RealtimeConfig {
            channel_buffer_size: 16,
            max_sessions_per_user: max_sessions,
            max_text_length: 1000,
        };
        let engine = RealtimeEngine::new(
            config,
            registry.clone(),
            presence,
            coordinator,
            broadcaster,
            notifications,
        );
        (registry, engine)
    }

    fn engine(max_sessions: usize) -> (Arc<ConnectionRegistry>, RealtimeEngine) {
        engine_with(max_sessions, Arc::new(FakeNotificationStore::default()))
    }

    fn identity(user_id: UserId) -> VerifiedToken {
        VerifiedToken {
            user_id,
            roles: vec!["guest".into()],
        }
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }

    #[tokio::test]
    async fn first_and_last_session_broadcast_presence_to_watchers() {
        let (registry, engine) = engine(5);
        let user = UserId::new();
        let watcher = UserId::new();

        let (watcher_handle, mut watcher_rx) = engine.connect(identity(watcher)).await.unwrap();
        registry.join(watcher_handle.id, Room::UserStatus(user));

        let (s1, _rx1) = engine.connect(identity(user)).await.unwrap();
        let (s2, _rx2) = engine.connect(identity(user)).await.unwrap();

        let events = drain(&mut watcher_rx);
        let online = events
            .iter()
            .filter(|e| {
                matches!(e, ServerEvent::UserStatus { user_id, is_online: true, .. } if *user_id == user)
            })
            .count();
        assert_eq!(online, 1, "only the first session goes online");

        engine.disconnect(s1.id).await;
        assert!(drain(&mut watcher_rx).is_empty(), "not the last session");

        engine.disconnect(s2.id).await;
        let events = drain(&mut watcher_rx);
        assert!(events.iter().any(|e| {
            matches!(e, ServerEvent::UserStatus { user_id, is_online: false, .. } if *user_id == user)
        }));
    }

    #[tokio::test]
    async fn session_cap_evicts_the_oldest() {
        let (registry, engine) = engine(2);
        let user = UserId::new();

        let (s1, _rx1) = engine.connect(identity(user)).await.unwrap();
        let (_s2, _rx2) = engine.connect(identity(user)).await.unwrap();
        let (_s3, _rx3) = engine.connect(identity(user)).await.unwrap();

        assert_eq!(registry.sessions_for_user(user).len(), 2);
        assert!(!s1.is_alive());
        assert!(registry.session(s1.id).is_none());
        // The user never dropped offline during the eviction.
        assert!(registry.is_online(user));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (_registry, engine) = engine(5);
        let (s, _rx) = engine.connect(identity(UserId::new())).await.unwrap();
        engine.disconnect(s.id).await;
        engine.disconnect(s.id).await;
    }

    #[tokio::test]
    async fn malformed_frames_get_a_validation_ack() {
        let (_registry, engine) = engine(5);
        let (handle, _rx) = engine.connect(identity(UserId::new())).await.unwrap();

        let ack = engine.handle_frame(&handle, "{not json").await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"]["type"], "VALIDATION");
    }

    #[tokio::test]
    async fn unknown_conversation_join_acks_not_found() {
        let (_registry, engine) = engine(5);
        let (handle, _rx) = engine.connect(identity(UserId::new())).await.unwrap();

        let frame = format!(
            r#"{{"event":"chat:join","conversationId":"{}"}}"#,
            ConversationId::new()
        );
        let ack = engine.handle_frame(&handle, &frame).await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"]["type"], "NOT_FOUND");
        assert_eq!(parsed["error"]["code"], 404);
    }

    #[tokio::test]
    async fn status_subscribe_returns_a_snapshot_and_joins_the_room() {
        let (registry, engine) = engine(5);
        let watched = UserId::new();
        let (_watched_handle, _watched_rx) = engine.connect(identity(watched)).await.unwrap();
        let (handle, _rx) = engine.connect(identity(UserId::new())).await.unwrap();

        let frame = format!(
            r#"{{"event":"user:status:subscribe","userId":"{watched}"}}"#
        );
        let ack = engine.handle_frame(&handle, &frame).await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"]["isOnline"], true);

        let members = registry.sessions_in_room(Room::UserStatus(watched));
        assert!(members.iter().any(|h| h.id == handle.id));
    }

    #[tokio::test]
    async fn notification_read_acks_the_remaining_unread_count() {
        let user = UserId::new();
        let store = Arc::new(FakeNotificationStore::default());
        let row = store
            .create_notification(NewNotification {
                user_id: user,
                event_type: "NEW_MESSAGE".into(),
                channel: NotificationChannel::Push,
                reference_id: None,
                title: "New message".into(),
                body: "You have a new message".into(),
                payload: None,
            })
            .await
            .unwrap();
        let (_registry, engine) = engine_with(5, store);

        let (handle, _rx) = engine.connect(identity(user)).await.unwrap();
        let frame = format!(
            r#"{{"event":"notification:read","notificationId":"{}"}}"#,
            row.id
        );
        let ack = engine.handle_frame(&handle, &frame).await;
        let parsed: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"]["unreadCount"], 0);
    }

    #[tokio::test]
    async fn shutdown_closes_every_session() {
        let (registry, engine) = engine(5);
        let (s1, _rx1) = engine.connect(identity(UserId::new())).await.unwrap();
        let (s2, _rx2) = engine.connect(identity(UserId::new())).await.unwrap();

        engine.shutdown().await;
        assert_eq!(registry.session_count(), 0);
        assert!(!s1.is_alive());
        assert!(!s2.is_alive());
    }
}
