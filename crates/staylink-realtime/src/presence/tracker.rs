//! Presence tracker — derives online/offline state from registry
//! transitions.
//!
//! The state machine per user is Offline → Online (first session) →
//! Offline (last session). Online-ness is always derived from the
//! connection registry so it can never drift from the session sets;
//! the tracker itself only owns last-seen bookkeeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::warn;

use staylink_core::result::AppResult;
use staylink_core::types::UserId;
use staylink_database::PresenceStore;
use staylink_entity::presence::PresenceState;

use crate::connection::registry::ConnectionRegistry;
use crate::message::types::ServerEvent;

/// Tracks presence state for all users.
pub struct PresenceTracker {
    /// Registry the online state derives from.
    registry: Arc<ConnectionRegistry>,
    /// User id → last seen timestamp (monotonically non-decreasing).
    last_seen: DashMap<UserId, DateTime<Utc>>,
    /// Durable last-seen persistence.
    store: Arc<dyn PresenceStore>,
}

impl PresenceTracker {
    /// Create a new presence tracker.
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn PresenceStore>) -> Self {
        Self {
            registry,
            last_seen: DashMap::new(),
            store,
        }
    }

    /// Record the Offline → Online transition.
    ///
    /// Returns the `user:status` event the caller broadcasts to the user's
    /// status room.
    pub async fn set_online(&self, user_id: UserId) -> AppResult<ServerEvent> {
        let at = self.touch(user_id);
        self.store.persist_last_seen(user_id, at).await?;
        Ok(ServerEvent::UserStatus {
            user_id,
            is_online: true,
            last_seen_at: at,
        })
    }

    /// Record the Online → Offline transition.
    pub async fn set_offline(&self, user_id: UserId) -> AppResult<ServerEvent> {
        let at = self.touch(user_id);
        self.store.persist_last_seen(user_id, at).await?;
        Ok(ServerEvent::UserStatus {
            user_id,
            is_online: false,
            last_seen_at: at,
        })
    }

    /// Refresh the in-memory last-seen timestamp on activity.
    ///
    /// Returns the (non-decreasing) timestamp now held for the user.
    pub fn touch(&self, user_id: UserId) -> DateTime<Utc> {
        let now = Utc::now();
        let mut entry = self.last_seen.entry(user_id).or_insert(now);
        if *entry < now {
            *entry = now;
        }
        *entry
    }

    /// Whether the registry currently holds a live session for the user.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    /// Current presence snapshot.
    ///
    /// Never fails: a user with no presence history reports offline with an
    /// epoch last-seen, falling back to the durable store when this process
    /// has not seen the user yet.
    pub async fn get_status(&self, user_id: UserId) -> PresenceState {
        let last_seen_at = match self.last_seen.get(&user_id) {
            Some(entry) => *entry.value(),
            None => match self.store.last_seen(user_id).await {
                Ok(stored) => stored.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Last-seen lookup failed");
                    DateTime::<Utc>::UNIX_EPOCH
                }
            },
        };
        PresenceState {
            user_id,
            is_online: self.registry.is_online(user_id),
            last_seen_at,
        }
    }
}
