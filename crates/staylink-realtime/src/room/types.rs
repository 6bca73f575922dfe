//! Room addressing.

use std::fmt;

use staylink_core::types::{ConversationId, UserId};

/// A logical broadcast address.
///
/// Rooms are not persisted; one exists only while at least one session has
/// joined it in the connection registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    /// A two-party conversation.
    Conversation(ConversationId),
    /// A user's personal status/notification channel.
    UserStatus(UserId),
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversation(id) => write!(f, "conversation:{id}"),
            Self::UserStatus(id) => write!(f, "user-status:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_names_are_prefixed() {
        let conv = ConversationId::new();
        assert_eq!(
            Room::Conversation(conv).to_string(),
            format!("conversation:{conv}")
        );
        let user = UserId::new();
        assert_eq!(
            Room::UserStatus(user).to_string(),
            format!("user-status:{user}")
        );
    }
}
