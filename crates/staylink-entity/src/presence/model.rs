//! Presence state model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staylink_core::types::UserId;

/// Derived online/offline state for a user.
///
/// `is_online` is true iff the connection registry holds at least one live
/// session for the user. `last_seen_at` is monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceState {
    /// The user this state describes.
    pub user_id: UserId,
    /// Whether any session is currently open.
    pub is_online: bool,
    /// Last connect/disconnect/activity transition.
    pub last_seen_at: DateTime<Utc>,
}

impl PresenceState {
    /// State returned for users with no presence history.
    pub fn unknown(user_id: UserId) -> Self {
        Self {
            user_id,
            is_online: false,
            last_seen_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}
