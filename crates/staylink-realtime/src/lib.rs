//! # staylink-realtime
//!
//! Presence-aware real-time messaging and notification fan-out for StayLink:
//!
//! - Connection registry with per-user session sets and room membership
//! - Presence tracking (online/offline, monotonic last-seen)
//! - Room broadcast with best-effort per-session delivery
//! - Chat coordination (send/edit/delete/read, store-derived unread counts)
//! - Notification dispatch with strict channel priority (realtime > push/bot)

pub mod chat;
pub mod connection;
pub mod engine;
pub mod message;
pub mod notification;
pub mod presence;
pub mod room;

pub use chat::coordinator::ChatCoordinator;
pub use connection::registry::ConnectionRegistry;
pub use engine::RealtimeEngine;
pub use notification::dispatcher::NotificationDispatcher;
pub use presence::tracker::PresenceTracker;
pub use room::broadcaster::RoomBroadcaster;
