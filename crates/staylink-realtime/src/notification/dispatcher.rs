//! Notification dispatcher — routes each domain event to exactly one
//! delivery strategy with strict channel priority.
//!
//! An online recipient gets the realtime channel and nothing else. An
//! offline recipient gets push and bot relay, each gated by their settings
//! and evaluated independently so a failure on one never suppresses the
//! other. A dispatch attempt is recorded in the store before the provider
//! call, so the audit trail survives provider outages.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use staylink_core::events::NotificationEvent;
use staylink_core::traits::{BotSender, PushSender};
use staylink_database::NotificationStore;
use staylink_entity::notification::{NewNotification, NotificationChannel, NotificationSetting};

use crate::message::types::ServerEvent;
use crate::notification::builder;
use crate::presence::PresenceTracker;
use crate::room::{Room, RoomBroadcaster};

/// Consumes the notification queue and delivers each event.
pub struct NotificationDispatcher {
    presence: Arc<PresenceTracker>,
    broadcaster: Arc<RoomBroadcaster>,
    store: Arc<dyn NotificationStore>,
    push: Arc<dyn PushSender>,
    bot: Arc<dyn BotSender>,
}

impl NotificationDispatcher {
    /// Create a dispatcher.
    pub fn new(
        presence: Arc<PresenceTracker>,
        broadcaster: Arc<RoomBroadcaster>,
        store: Arc<dyn NotificationStore>,
        push: Arc<dyn PushSender>,
        bot: Arc<dyn BotSender>,
    ) -> Self {
        Self {
            presence,
            broadcaster,
            store,
            push,
            bot,
        }
    }

    /// Create the typed event queue producers publish into.
    pub fn channel(
        capacity: usize,
    ) -> (
        mpsc::Sender<NotificationEvent>,
        mpsc::Receiver<NotificationEvent>,
    ) {
        mpsc::channel(capacity)
    }

    /// Spawn the consumer loop. The task ends when every producer handle
    /// has been dropped.
    pub fn spawn(self: Arc<Self>, mut rx: mpsc::Receiver<NotificationEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                self.dispatch(event).await;
            }
            debug!("Notification queue closed");
        })
    }

    /// Deliver one event. Never fails: every error is logged and the event
    /// is dropped rather than retried.
    pub async fn dispatch(&self, event: NotificationEvent) {
        let recipient = event.recipient;
        let text = builder::build(event.event_type, event.payload.as_ref());

        if self.presence.is_online(recipient) {
            self.deliver_realtime(&event, &text.title, &text.body).await;
            return;
        }

        let settings = match self.store.get_settings(recipient).await {
            Ok(settings) => settings.unwrap_or_else(|| NotificationSetting::disabled(recipient)),
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Settings lookup failed, dropping event");
                return;
            }
        };

        let mut delivered = false;
        if settings.send_push {
            delivered |= self.deliver_push(&event, &text.title, &text.body).await;
        }
        if settings.send_bot_relay {
            delivered |= self.deliver_bot(&event, &text.title, &text.body).await;
        }
        if !delivered {
            debug!(
                user_id = %recipient,
                event_type = event.event_type.as_str(),
                "Notification dropped, no delivery channel available"
            );
        }
    }

    async fn deliver_realtime(&self, event: &NotificationEvent, title: &str, body: &str) {
        let recipient = event.recipient;
        let row = match self
            .store
            .create_notification(self.row(event, NotificationChannel::Realtime, title, body))
            .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Failed to record realtime notification");
                return;
            }
        };

        let frame = ServerEvent::Notification {
            id: row.id,
            event_type: row.event_type,
            title: row.title,
            body: row.body,
            reference_id: row.reference_id,
            payload: row.payload,
            created_at: row.created_at,
        };
        if let Err(e) = self
            .broadcaster
            .broadcast(Room::UserStatus(recipient), &frame, None)
        {
            warn!(user_id = %recipient, error = %e, "Realtime notification broadcast failed");
        }
    }

    /// Returns true when a push was recorded and handed to the provider.
    async fn deliver_push(&self, event: &NotificationEvent, title: &str, body: &str) -> bool {
        let recipient = event.recipient;
        let tokens = match self.store.push_tokens(recipient).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Push token lookup failed");
                return false;
            }
        };
        if tokens.is_empty() {
            return false;
        }

        if let Err(e) = self
            .store
            .create_notification(self.row(event, NotificationChannel::Push, title, body))
            .await
        {
            warn!(user_id = %recipient, error = %e, "Failed to record push notification");
            return false;
        }

        let token_values: Vec<String> = tokens.into_iter().map(|t| t.token).collect();
        let data = serde_json::json!({
            "eventType": event.event_type.as_str(),
            "referenceId": event.reference_id,
        });
        match self.push.send(&token_values, title, body, &data).await {
            Ok(outcome) => {
                if !outcome.invalid_tokens.is_empty() {
                    // Dead tokens are pruned so the next dispatch stops
                    // paying for them.
                    if let Err(e) = self.store.delete_push_tokens(&outcome.invalid_tokens).await {
                        warn!(user_id = %recipient, error = %e, "Failed to prune invalid push tokens");
                    }
                }
                debug!(user_id = %recipient, delivered = outcome.delivered, "Push dispatched");
            }
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Push delivery failed");
            }
        }
        true
    }

    /// Returns true when a bot-relay message was recorded and handed off.
    async fn deliver_bot(&self, event: &NotificationEvent, title: &str, body: &str) -> bool {
        let recipient = event.recipient;
        let link = match self.store.bot_link(recipient).await {
            Ok(link) => link,
            Err(e) => {
                warn!(user_id = %recipient, error = %e, "Bot link lookup failed");
                return false;
            }
        };
        let Some(link) = link else {
            return false;
        };

        if let Err(e) = self
            .store
            .create_notification(self.row(event, NotificationChannel::Bot, title, body))
            .await
        {
            warn!(user_id = %recipient, error = %e, "Failed to record bot notification");
            return false;
        }

        let message = format!("{title}\n{body}");
        if let Err(e) = self.bot.send(&link.chat_id, &message).await {
            warn!(user_id = %recipient, error = %e, "Bot relay delivery failed");
        }
        true
    }

    fn row(
        &self,
        event: &NotificationEvent,
        channel: NotificationChannel,
        title: &str,
        body: &str,
    ) -> NewNotification {
        NewNotification {
            user_id: event.recipient,
            event_type: event.event_type.as_str().to_string(),
            channel,
            reference_id: event.reference_id,
            title: title.to_string(),
            body: body.to_string(),
            payload: event.payload.clone(),
        }
    }
}
