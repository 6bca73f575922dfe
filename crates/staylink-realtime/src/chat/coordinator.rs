//! Chat coordinator — orchestrates message operations across the store,
//! the registry, and the room broadcaster.
//!
//! Persistence always happens before fan-out, so a broadcast failure can
//! never leave the store and the clients disagreeing about what was saved.
//! Unread counts are always recomputed from the store, never adjusted
//! incrementally.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use staylink_core::error::AppError;
use staylink_core::result::AppResult;
use staylink_core::types::{ConversationId, MessageId, SessionId, UserId};
use staylink_database::ChatStore;
use staylink_entity::conversation::Conversation;
use staylink_entity::message::Message;

use crate::connection::registry::ConnectionRegistry;
use crate::message::types::ServerEvent;
use crate::message::validator::{require_ids, TextRules};
use crate::room::{Room, RoomBroadcaster};

/// Snapshot returned to a session joining a conversation room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationJoined {
    /// Unread count for the joining user, derived from the store.
    pub unread_count: i64,
    /// The conversation's latest message, if any.
    pub last_message: Option<Message>,
}

/// Orchestrates all chat operations for live sessions.
pub struct ChatCoordinator {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
    rules: TextRules,
}

impl ChatCoordinator {
    /// Create a coordinator with the given text rules.
    pub fn new(
        store: Arc<dyn ChatStore>,
        registry: Arc<ConnectionRegistry>,
        broadcaster: Arc<RoomBroadcaster>,
        rules: TextRules,
    ) -> Self {
        Self {
            store,
            registry,
            broadcaster,
            rules,
        }
    }

    /// Join a conversation room and return the caller's current view of it.
    pub async fn join_conversation(
        &self,
        session_id: SessionId,
        caller: UserId,
        conversation_id: ConversationId,
    ) -> AppResult<ConversationJoined> {
        self.require_participant(conversation_id, caller).await?;
        self.registry
            .join(session_id, Room::Conversation(conversation_id));

        let unread_count = self.store.unread_count(conversation_id, caller).await?;
        let last_message = self.store.last_message(conversation_id).await?;
        Ok(ConversationJoined {
            unread_count,
            last_message,
        })
    }

    /// Leave a conversation room. Leaving a room never joined is a no-op.
    pub fn leave_conversation(&self, session_id: SessionId, conversation_id: ConversationId) {
        self.registry
            .leave(session_id, Room::Conversation(conversation_id));
    }

    /// Persist and fan out a new message.
    ///
    /// The sender's acting session is excluded from the `message:new`
    /// broadcast; it learns the outcome from its ack.
    pub async fn send_message(
        &self,
        session_id: SessionId,
        caller: UserId,
        conversation_id: ConversationId,
        text: &str,
    ) -> AppResult<Message> {
        let conversation = self.require_participant(conversation_id, caller).await?;
        self.rules.check(text)?;

        let message = self
            .store
            .create_message(conversation_id, caller, text)
            .await?;
        self.store
            .touch_last_message_at(conversation_id, message.sent_at)
            .await?;

        let room = Room::Conversation(conversation_id);
        self.fan_out(
            room,
            &ServerEvent::MessageNew {
                message: message.clone(),
            },
            Some(session_id),
        );
        self.fan_out(
            room,
            &ServerEvent::LastMessage {
                conversation_id,
                message: Some(message.clone()),
            },
            None,
        );
        if let Some(recipient) = conversation.other_participant(caller) {
            self.emit_unreads(conversation_id, recipient).await;
        }

        Ok(message)
    }

    /// Mark messages addressed to the caller as read.
    ///
    /// With `message_ids = None` everything unread addressed to the caller
    /// is marked. With an explicit list, ids that are not in the
    /// conversation, not addressed to the caller, or already read are
    /// silently dropped. Returns the ids actually marked.
    pub async fn mark_as_read(
        &self,
        session_id: SessionId,
        caller: UserId,
        conversation_id: ConversationId,
        message_ids: Option<Vec<MessageId>>,
    ) -> AppResult<Vec<MessageId>> {
        self.require_participant(conversation_id, caller).await?;

        let targets = match message_ids {
            None => self.store.unread_message_ids(conversation_id, caller).await?,
            Some(ids) => {
                require_ids(&ids)?;
                self.store
                    .find_messages(conversation_id, &ids)
                    .await?
                    .into_iter()
                    .filter(|m| m.addressed_to(caller) && m.is_unread())
                    .map(|m| m.id)
                    .collect()
            }
        };
        if targets.is_empty() {
            return Ok(targets);
        }

        self.store.mark_read(&targets, Utc::now()).await?;

        let room = Room::Conversation(conversation_id);
        self.fan_out(
            room,
            &ServerEvent::MessageReadUpdate {
                conversation_id,
                user_id: caller,
                message_ids: targets.clone(),
            },
            Some(session_id),
        );

        // The latest message may have flipped to read; refresh the preview.
        let last_message = self.store.last_message(conversation_id).await?;
        if last_message
            .as_ref()
            .is_some_and(|m| targets.contains(&m.id))
        {
            self.fan_out(
                room,
                &ServerEvent::LastMessage {
                    conversation_id,
                    message: last_message,
                },
                None,
            );
        }
        self.emit_unreads(conversation_id, caller).await;

        Ok(targets)
    }

    /// Replace a message's text. Only the sender may edit.
    pub async fn edit_message(
        &self,
        session_id: SessionId,
        caller: UserId,
        conversation_id: ConversationId,
        message_id: MessageId,
        new_text: &str,
    ) -> AppResult<Message> {
        self.require_participant(conversation_id, caller).await?;
        self.rules.check(new_text)?;
        self.verify_ownership(conversation_id, &[message_id], caller)
            .await?;

        let updated = self.store.update_message_text(message_id, new_text).await?;

        let room = Room::Conversation(conversation_id);
        self.fan_out(
            room,
            &ServerEvent::MessageEdited {
                message: updated.clone(),
            },
            Some(session_id),
        );
        let last_message = self.store.last_message(conversation_id).await?;
        if last_message.as_ref().is_some_and(|m| m.id == message_id) {
            self.fan_out(
                room,
                &ServerEvent::LastMessage {
                    conversation_id,
                    message: last_message,
                },
                None,
            );
        }

        Ok(updated)
    }

    /// Delete messages. All-or-nothing: every listed id must exist in the
    /// conversation and belong to the caller, or nothing is deleted.
    pub async fn delete_messages(
        &self,
        session_id: SessionId,
        caller: UserId,
        conversation_id: ConversationId,
        message_ids: Vec<MessageId>,
    ) -> AppResult<u64> {
        require_ids(&message_ids)?;
        let conversation = self.require_participant(conversation_id, caller).await?;
        let owned = self
            .verify_ownership(conversation_id, &message_ids, caller)
            .await?;

        let last_before = self.store.last_message(conversation_id).await?;
        let any_unread = owned.iter().any(Message::is_unread);

        let deleted = self.store.delete_messages(&message_ids).await?;

        let room = Room::Conversation(conversation_id);
        self.fan_out(
            room,
            &ServerEvent::MessageDeleted {
                conversation_id,
                message_ids: message_ids.clone(),
            },
            Some(session_id),
        );
        if last_before.is_some_and(|m| message_ids.contains(&m.id)) {
            let last_message = self.store.last_message(conversation_id).await?;
            self.fan_out(
                room,
                &ServerEvent::LastMessage {
                    conversation_id,
                    message: last_message,
                },
                None,
            );
        }
        if any_unread {
            if let Some(recipient) = conversation.other_participant(caller) {
                self.emit_unreads(conversation_id, recipient).await;
            }
        }

        Ok(deleted)
    }

    /// Resolve the conversation and require the caller to be a participant.
    async fn require_participant(
        &self,
        conversation_id: ConversationId,
        caller: UserId,
    ) -> AppResult<Conversation> {
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation not found"))?;
        if !conversation.has_participant(caller) {
            return Err(AppError::access_denied("Not a participant"));
        }
        Ok(conversation)
    }

    /// Require every listed message to exist in the conversation and be
    /// owned by the caller. Nothing is mutated on failure.
    async fn verify_ownership(
        &self,
        conversation_id: ConversationId,
        ids: &[MessageId],
        caller: UserId,
    ) -> AppResult<Vec<Message>> {
        let found = self.store.find_messages(conversation_id, ids).await?;
        if found.len() != ids.len() {
            return Err(AppError::not_found("Message not found"));
        }
        if found.iter().any(|m| m.sender_id != caller) {
            return Err(AppError::access_denied(
                "Only the sender may modify a message",
            ));
        }
        Ok(found)
    }

    /// Recompute and broadcast the unread count for one recipient.
    async fn emit_unreads(&self, conversation_id: ConversationId, recipient: UserId) {
        match self.store.unread_count(conversation_id, recipient).await {
            Ok(count) => self.fan_out(
                Room::Conversation(conversation_id),
                &ServerEvent::Unreads {
                    conversation_id,
                    user_id: recipient,
                    count,
                },
                None,
            ),
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "Unread recount failed");
            }
        }
    }

    /// Broadcast, logging (not propagating) failures: the store write has
    /// already happened by the time fan-out runs.
    fn fan_out(&self, room: Room, event: &ServerEvent, exclude: Option<SessionId>) {
        if let Err(e) = self.broadcaster.broadcast(room, event, exclude) {
            warn!(room = %room, error = %e, "Broadcast failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use staylink_core::error::ErrorKind;

    use crate::connection::handle::SessionHandle;

    #[derive(Default)]
    struct InMemoryChatStore {
        conversations: Mutex<Vec<Conversation>>,
        messages: Mutex<Vec<Message>>,
    }

    impl InMemoryChatStore {
        fn with_conversation(conversation: Conversation) -> Self {
            let store = Self::default();
            store.conversations.lock().unwrap().push(conversation);
            store
        }

        fn insert_message(&self, message: Message) {
            self.messages.lock().unwrap().push(message);
        }

        fn message(&self, id: MessageId) -> Option<Message> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .cloned()
        }

        fn message_count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatStore for InMemoryChatStore {
        async fn find_conversation(
            &self,
            id: ConversationId,
        ) -> AppResult<Option<Conversation>> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id && !c.is_deleted())
                .cloned())
        }

        async fn create_message(
            &self,
            conversation_id: ConversationId,
            sender_id: UserId,
            text: &str,
        ) -> AppResult<Message> {
            let message = Message {
                id: MessageId::new(),
                conversation_id,
                sender_id,
                text: text.to_string(),
                is_read: false,
                read_at: None,
                sent_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.messages.lock().unwrap().push(message.clone());
            Ok(message)
        }

        async fn find_messages(
            &self,
            conversation_id: ConversationId,
            ids: &[MessageId],
        ) -> AppResult<Vec<Message>> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id == conversation_id && ids.contains(&m.id))
                .cloned()
                .collect())
        }

        async fn last_message(
            &self,
            conversation_id: ConversationId,
        ) -> AppResult<Option<Message>> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id == conversation_id)
                .max_by_key(|m| m.sent_at)
                .cloned())
        }

        async fn unread_count(
            &self,
            conversation_id: ConversationId,
            recipient: UserId,
        ) -> AppResult<i64> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| {
                    m.conversation_id == conversation_id
                        && m.addressed_to(recipient)
                        && m.is_unread()
                })
                .count() as i64)
        }

        async fn unread_message_ids(
            &self,
            conversation_id: ConversationId,
            recipient: UserId,
        ) -> AppResult<Vec<MessageId>> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| {
                    m.conversation_id == conversation_id
                        && m.addressed_to(recipient)
                        && m.is_unread()
                })
                .map(|m| m.id)
                .collect())
        }

        async fn mark_read(
            &self,
            ids: &[MessageId],
            read_at: DateTime<Utc>,
        ) -> AppResult<u64> {
            let mut messages = self.messages.lock().unwrap();
            let mut changed = 0;
            for m in messages.iter_mut().filter(|m| ids.contains(&m.id)) {
                m.is_read = true;
                m.read_at = Some(read_at);
                changed += 1;
            }
            Ok(changed)
        }

        async fn update_message_text(&self, id: MessageId, text: &str) -> AppResult<Message> {
            let mut messages = self.messages.lock().unwrap();
            let m = messages
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| AppError::not_found("Message not found"))?;
            m.text = text.to_string();
            m.updated_at = Utc::now();
            Ok(m.clone())
        }

        async fn delete_messages(&self, ids: &[MessageId]) -> AppResult<u64> {
            let mut messages = self.messages.lock().unwrap();
            let before = messages.len();
            messages.retain(|m| !ids.contains(&m.id));
            Ok((before - messages.len()) as u64)
        }

        async fn touch_last_message_at(
            &self,
            conversation_id: ConversationId,
            at: DateTime<Utc>,
        ) -> AppResult<()> {
            let mut conversations = self.conversations.lock().unwrap();
            if let Some(c) = conversations.iter_mut().find(|c| c.id == conversation_id) {
                c.last_message_at = Some(at);
            }
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<InMemoryChatStore>,
        registry: Arc<ConnectionRegistry>,
        coordinator: ChatCoordinator,
        conversation_id: ConversationId,
        guest: UserId,
        host: UserId,
    }

    fn fixture() -> Fixture {
        let guest = UserId::new();
        let host = UserId::new();
        let conversation = Conversation {
            id: ConversationId::new(),
            participant_a: guest,
            participant_b: host,
            listing_id: None,
            last_message_at: None,
            created_at: Utc::now(),
            deleted_at: None,
        };
        let conversation_id = conversation.id;
        let store = Arc::new(InMemoryChatStore::with_conversation(conversation));
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone()));
        let coordinator = ChatCoordinator::new(
            store.clone(),
            registry.clone(),
            broadcaster,
            TextRules::default(),
        );
        Fixture {
            store,
            registry,
            coordinator,
            conversation_id,
            guest,
            host,
        }
    }

    fn connect(fixture: &Fixture, user: UserId) -> (Arc<SessionHandle>, mpsc::Receiver<String>) {
        let (handle, rx) = SessionHandle::new(user, vec!["guest".into()], 16);
        let handle = Arc::new(handle);
        fixture.registry.register(handle.clone());
        fixture
            .registry
            .join(handle.id, Room::Conversation(fixture.conversation_id));
        (handle, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }

    fn seed_message(fixture: &Fixture, sender: UserId, sent_at: DateTime<Utc>) -> MessageId {
        let message = Message {
            id: MessageId::new(),
            conversation_id: fixture.conversation_id,
            sender_id: sender,
            text: "seeded".into(),
            is_read: false,
            read_at: None,
            sent_at,
            updated_at: sent_at,
        };
        let id = message.id;
        fixture.store.insert_message(message);
        id
    }

    #[tokio::test]
    async fn send_message_fans_out_to_peers_not_the_sender() {
        let f = fixture();
        let (guest_session, mut guest_rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let message = f
            .coordinator
            .send_message(guest_session.id, f.guest, f.conversation_id, "hello")
            .await
            .unwrap();
        assert_eq!(message.text, "hello");

        let host_events = drain(&mut host_rx);
        assert!(host_events
            .iter()
            .any(|e| matches!(e, ServerEvent::MessageNew { .. })));
        assert!(host_events
            .iter()
            .any(|e| matches!(e, ServerEvent::LastMessage { .. })));
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::Unreads { user_id, count: 1, .. } if *user_id == f.host)
        ));

        // The sender's session sees the derived events but not message:new.
        let guest_events = drain(&mut guest_rx);
        assert!(!guest_events
            .iter()
            .any(|e| matches!(e, ServerEvent::MessageNew { .. })));
        assert!(guest_events
            .iter()
            .any(|e| matches!(e, ServerEvent::LastMessage { .. })));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_side_effects() {
        let f = fixture();
        let (guest_session, _guest_rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let err = f
            .coordinator
            .send_message(guest_session.id, f.guest, f.conversation_id, "")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(f.store.message_count(), 0);
        assert!(drain(&mut host_rx).is_empty());
    }

    #[tokio::test]
    async fn non_participants_are_denied() {
        let f = fixture();
        let outsider = UserId::new();
        let (session, _rx) = connect(&f, outsider);

        let err = f
            .coordinator
            .send_message(session.id, outsider, f.conversation_id, "hi")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let f = fixture();
        let (session, _rx) = connect(&f, f.guest);
        let err = f
            .coordinator
            .join_conversation(session.id, f.guest, ConversationId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn join_returns_store_derived_snapshot() {
        let f = fixture();
        seed_message(&f, f.host, Utc::now() - Duration::minutes(2));
        let last = seed_message(&f, f.host, Utc::now());

        let (session, _rx) = connect(&f, f.guest);
        let joined = f
            .coordinator
            .join_conversation(session.id, f.guest, f.conversation_id)
            .await
            .unwrap();
        assert_eq!(joined.unread_count, 2);
        assert_eq!(joined.last_message.unwrap().id, last);
    }

    #[tokio::test]
    async fn mark_all_read_zeroes_the_unread_count() {
        let f = fixture();
        seed_message(&f, f.host, Utc::now() - Duration::minutes(1));
        let last = seed_message(&f, f.host, Utc::now());

        let (guest_session, mut guest_rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let marked = f
            .coordinator
            .mark_as_read(guest_session.id, f.guest, f.conversation_id, None)
            .await
            .unwrap();
        assert_eq!(marked.len(), 2);
        assert!(f.store.message(last).unwrap().is_read);

        let host_events = drain(&mut host_rx);
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::MessageReadUpdate { message_ids, .. } if message_ids.len() == 2)
        ));
        // The latest message flipped to read, so the preview is re-emitted.
        assert!(host_events
            .iter()
            .any(|e| matches!(e, ServerEvent::LastMessage { .. })));
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::Unreads { user_id, count: 0, .. } if *user_id == f.guest)
        ));

        // The acting session does not receive its own read-update.
        assert!(!drain(&mut guest_rx)
            .iter()
            .any(|e| matches!(e, ServerEvent::MessageReadUpdate { .. })));
    }

    #[tokio::test]
    async fn mark_read_drops_foreign_and_own_ids() {
        let f = fixture();
        let own = seed_message(&f, f.guest, Utc::now() - Duration::minutes(1));
        let theirs = seed_message(&f, f.host, Utc::now());

        let (session, _rx) = connect(&f, f.guest);
        let marked = f
            .coordinator
            .mark_as_read(
                session.id,
                f.guest,
                f.conversation_id,
                Some(vec![own, theirs, MessageId::new()]),
            )
            .await
            .unwrap();
        assert_eq!(marked, vec![theirs]);
        assert!(!f.store.message(own).unwrap().is_read);
    }

    #[tokio::test]
    async fn mark_read_with_nothing_unread_is_a_noop() {
        let f = fixture();
        let (session, _rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let marked = f
            .coordinator
            .mark_as_read(session.id, f.guest, f.conversation_id, None)
            .await
            .unwrap();
        assert!(marked.is_empty());
        assert!(drain(&mut host_rx).is_empty());
    }

    #[tokio::test]
    async fn only_the_sender_may_edit() {
        let f = fixture();
        let id = seed_message(&f, f.host, Utc::now());
        let (session, _rx) = connect(&f, f.guest);

        let err = f
            .coordinator
            .edit_message(session.id, f.guest, f.conversation_id, id, "hijacked")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(f.store.message(id).unwrap().text, "seeded");
    }

    #[tokio::test]
    async fn editing_the_latest_message_refreshes_the_preview() {
        let f = fixture();
        let id = seed_message(&f, f.guest, Utc::now());
        let (guest_session, _guest_rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let updated = f
            .coordinator
            .edit_message(guest_session.id, f.guest, f.conversation_id, id, "fixed")
            .await
            .unwrap();
        assert_eq!(updated.text, "fixed");

        let host_events = drain(&mut host_rx);
        assert!(host_events
            .iter()
            .any(|e| matches!(e, ServerEvent::MessageEdited { .. })));
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::LastMessage { message: Some(m), .. } if m.text == "fixed")
        ));
    }

    #[tokio::test]
    async fn delete_is_all_or_nothing() {
        let f = fixture();
        let mine = seed_message(&f, f.guest, Utc::now() - Duration::minutes(1));
        let theirs = seed_message(&f, f.host, Utc::now());
        let (session, _rx) = connect(&f, f.guest);

        let err = f
            .coordinator
            .delete_messages(session.id, f.guest, f.conversation_id, vec![mine, theirs])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(f.store.message_count(), 2);
    }

    #[tokio::test]
    async fn deleting_the_latest_message_recomputes_the_preview() {
        let f = fixture();
        let older = seed_message(&f, f.guest, Utc::now() - Duration::minutes(5));
        let latest = seed_message(&f, f.guest, Utc::now());
        let (guest_session, _guest_rx) = connect(&f, f.guest);
        let (_host_session, mut host_rx) = connect(&f, f.host);

        let deleted = f
            .coordinator
            .delete_messages(guest_session.id, f.guest, f.conversation_id, vec![latest])
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let host_events = drain(&mut host_rx);
        assert!(host_events
            .iter()
            .any(|e| matches!(e, ServerEvent::MessageDeleted { .. })));
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::LastMessage { message: Some(m), .. } if m.id == older)
        ));
        // Deleted unread messages change the host's count.
        assert!(host_events.iter().any(
            |e| matches!(e, ServerEvent::Unreads { user_id, count: 1, .. } if *user_id == f.host)
        ));
    }

    #[tokio::test]
    async fn delete_with_an_unknown_id_deletes_nothing() {
        let f = fixture();
        let mine = seed_message(&f, f.guest, Utc::now());
        let (session, _rx) = connect(&f, f.guest);

        let err = f
            .coordinator
            .delete_messages(
                session.id,
                f.guest,
                f.conversation_id,
                vec![mine, MessageId::new()],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(f.store.message_count(), 1);
    }

    #[tokio::test]
    async fn empty_delete_list_is_a_validation_error() {
        let f = fixture();
        let (session, _rx) = connect(&f, f.guest);
        let err = f
            .coordinator
            .delete_messages(session.id, f.guest, f.conversation_id, Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
