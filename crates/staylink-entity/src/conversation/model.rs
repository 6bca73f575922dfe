//! Conversation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staylink_core::types::{ConversationId, ListingId, UserId};

/// A two-party conversation, optionally tied to a listing.
///
/// Invariant: at most one live conversation exists per unordered
/// participant pair and listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,
    /// First participant.
    pub participant_a: UserId,
    /// Second participant.
    pub participant_b: UserId,
    /// Listing this conversation is about, if any.
    pub listing_id: Option<ListingId>,
    /// Timestamp of the most recent message.
    pub last_message_at: Option<DateTime<Utc>>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Check whether a user is one of the two participants.
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// The counterpart of the given participant.
    ///
    /// Returns `None` if the user is not a participant at all.
    pub fn other_participant(&self, user_id: UserId) -> Option<UserId> {
        if self.participant_a == user_id {
            Some(self.participant_b)
        } else if self.participant_b == user_id {
            Some(self.participant_a)
        } else {
            None
        }
    }

    /// Whether the conversation has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(a: UserId, b: UserId) -> Conversation {
        Conversation {
            id: ConversationId::new(),
            participant_a: a,
            participant_b: b,
            listing_id: None,
            last_message_at: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn other_participant_resolves_both_directions() {
        let a = UserId::new();
        let b = UserId::new();
        let conv = conversation(a, b);
        assert_eq!(conv.other_participant(a), Some(b));
        assert_eq!(conv.other_participant(b), Some(a));
        assert_eq!(conv.other_participant(UserId::new()), None);
    }
}
