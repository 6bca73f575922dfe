//! Individual realtime session handle.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Notify};
use tracing::warn;

use staylink_core::types::{SessionId, UserId};

/// A handle to a single open realtime session.
///
/// Holds the sender half of the per-connection outbound queue plus metadata
/// about the authenticated user. Owned by the connection registry.
#[derive(Debug)]
pub struct SessionHandle {
    /// Unique session id.
    pub id: SessionId,
    /// User who owns this session.
    pub user_id: UserId,
    /// Roles carried by the session's token.
    pub roles: Vec<String>,
    /// When the handshake was authenticated.
    pub authenticated_at: DateTime<Utc>,
    /// Sender for serialized outbound frames.
    sender: mpsc::Sender<String>,
    /// Whether the session is still alive.
    alive: AtomicBool,
    /// Signalled once when the session is closed.
    closed: Notify,
}

impl SessionHandle {
    /// Create a new session handle and its outbound receiver.
    pub fn new(
        user_id: UserId,
        roles: Vec<String>,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(buffer);
        let handle = Self {
            id: SessionId::new(),
            user_id,
            roles,
            authenticated_at: Utc::now(),
            sender: tx,
            alive: AtomicBool::new(true),
            closed: Notify::new(),
        };
        (handle, rx)
    }

    /// Push a serialized frame onto the session's outbound queue.
    ///
    /// Returns false when the frame was dropped (buffer full or transport
    /// closed); callers treat that as a skipped delivery, never a fatal one.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(session_id = %self.id, "Session send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Check whether the session is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the session as closed and wake anyone waiting in [`Self::closed`].
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.closed.notify_waiters();
    }

    /// Resolve once the session has been closed.
    ///
    /// Used by the transport task to notice an eviction or server shutdown
    /// while it is blocked on the socket.
    pub async fn closed(&self) {
        let mut notified = pin!(self.closed.notified());
        notified.as_mut().enable();
        if !self.is_alive() {
            return;
        }
        notified.await;
    }
}
