//! Connection registry — the arena of live sessions and their room
//! membership.
//!
//! All mutation goes through this API; handler code never touches the
//! underlying maps directly. Operations on one user are serialized by the
//! per-key entry locks of the user index, so a late unregister can never
//! erase a session registered concurrently by a racing reconnect;
//! registrations for different users never block each other.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use staylink_core::types::{SessionId, UserId};

use crate::room::Room;

use super::handle::SessionHandle;

/// Registry of all live sessions, indexed by session, user, and room.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// Session id → handle.
    sessions: DashMap<SessionId, Arc<SessionHandle>>,
    /// User id → set of live session ids.
    by_user: DashMap<UserId, HashSet<SessionId>>,
    /// Room → set of joined session ids.
    rooms: DashMap<Room, HashSet<SessionId>>,
    /// Session id → rooms it joined (reverse index for cleanup).
    joined: DashMap<SessionId, HashSet<Room>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new live session.
    ///
    /// Returns true when this is the user's first session, i.e. the caller
    /// must trigger a presence transition to online.
    pub fn register(&self, handle: Arc<SessionHandle>) -> bool {
        let user_id = handle.user_id;
        let session_id = handle.id;

        // The user entry lock is held across both inserts so register and
        // unregister for the same user are strictly ordered.
        let mut user_sessions = self.by_user.entry(user_id).or_default();
        self.sessions.insert(session_id, handle);
        user_sessions.insert(session_id);
        let first = user_sessions.len() == 1;

        debug!(session_id = %session_id, user_id = %user_id, first, "Session registered");
        first
    }

    /// Remove a session. Safe to call twice; the second call is a no-op.
    ///
    /// Returns the removed handle and whether it was the user's last
    /// session (the caller must then trigger a presence transition to
    /// offline).
    pub fn unregister(&self, session_id: SessionId) -> Option<(Arc<SessionHandle>, bool)> {
        let (_, handle) = self.sessions.remove(&session_id)?;
        let user_id = handle.user_id;

        let last = {
            let mut user_sessions = self.by_user.entry(user_id).or_default();
            user_sessions.remove(&session_id);
            user_sessions.is_empty()
        };
        if last {
            self.by_user.remove_if(&user_id, |_, set| set.is_empty());
        }

        self.leave_all(session_id);

        debug!(session_id = %session_id, user_id = %user_id, last, "Session unregistered");
        Some((handle, last))
    }

    /// Join a session to a room. Joining twice is a no-op success.
    pub fn join(&self, session_id: SessionId, room: Room) {
        if !self.sessions.contains_key(&session_id) {
            return;
        }
        self.rooms.entry(room).or_default().insert(session_id);
        self.joined.entry(session_id).or_default().insert(room);
    }

    /// Remove a session from a room. Leaving twice is a no-op.
    pub fn leave(&self, session_id: SessionId, room: Room) {
        if let Some(mut members) = self.rooms.get_mut(&room) {
            members.remove(&session_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove_if(&room, |_, set| set.is_empty());
            }
        }
        if let Some(mut joined) = self.joined.get_mut(&session_id) {
            joined.remove(&room);
        }
    }

    /// Remove a session from every room it joined.
    pub fn leave_all(&self, session_id: SessionId) {
        if let Some((_, rooms)) = self.joined.remove(&session_id) {
            for room in rooms {
                if let Some(mut members) = self.rooms.get_mut(&room) {
                    members.remove(&session_id);
                    if members.is_empty() {
                        drop(members);
                        self.rooms.remove_if(&room, |_, set| set.is_empty());
                    }
                }
            }
        }
    }

    /// All live session handles currently joined to a room.
    pub fn sessions_in_room(&self, room: Room) -> Vec<Arc<SessionHandle>> {
        let Some(members) = self.rooms.get(&room) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|id| self.sessions.get(id).map(|e| e.value().clone()))
            .collect()
    }

    /// Whether the registry holds at least one live session for the user.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.by_user
            .get(&user_id)
            .map(|set| !set.is_empty())
            .unwrap_or(false)
    }

    /// Look up a session handle.
    pub fn session(&self, session_id: SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&session_id).map(|e| e.value().clone())
    }

    /// All live sessions for a user, oldest first.
    pub fn sessions_for_user(&self, user_id: UserId) -> Vec<Arc<SessionHandle>> {
        let Some(set) = self.by_user.get(&user_id) else {
            return Vec::new();
        };
        let mut handles: Vec<_> = set
            .iter()
            .filter_map(|id| self.sessions.get(id).map(|e| e.value().clone()))
            .collect();
        handles.sort_by_key(|h| h.authenticated_at);
        handles
    }

    /// Total number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of distinct online users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// All live session handles.
    pub fn all_sessions(&self) -> Vec<Arc<SessionHandle>> {
        self.sessions.iter().map(|e| e.value().clone()).collect()
    }
}
