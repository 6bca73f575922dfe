//! Best-effort fan-out of server events to room members.

use std::sync::Arc;

use tracing::{debug, warn};

use staylink_core::result::AppResult;
use staylink_core::types::SessionId;

use crate::connection::registry::ConnectionRegistry;
use crate::message::types::ServerEvent;

use super::Room;

/// Broadcasts server events to every live session in a room.
///
/// Delivery is best effort per session: a slow or dead session is skipped
/// with a warning and never blocks or fails delivery to its peers.
pub struct RoomBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl RoomBroadcaster {
    /// Create a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send an event to every session in the room, except `exclude`.
    ///
    /// The event is serialized once and the same frame is pushed to each
    /// session's outbound queue. Returns how many sessions accepted the
    /// frame. Broadcasting to an empty room is a successful no-op.
    pub fn broadcast(
        &self,
        room: Room,
        event: &ServerEvent,
        exclude: Option<SessionId>,
    ) -> AppResult<usize> {
        let members = self.registry.sessions_in_room(room);
        if members.is_empty() {
            return Ok(0);
        }

        let frame = serde_json::to_string(event)?;
        let mut delivered = 0;
        for handle in members {
            if exclude == Some(handle.id) {
                continue;
            }
            if handle.send(frame.clone()) {
                delivered += 1;
            } else {
                warn!(session_id = %handle.id, room = %room, "Skipping undeliverable session");
            }
        }

        debug!(room = %room, delivered, "Broadcast complete");
        Ok(delivered)
    }
}
