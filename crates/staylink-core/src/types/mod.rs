//! Shared type definitions.

pub mod id;

pub use id::{ConversationId, ListingId, MessageId, NotificationId, SessionId, UserId};
