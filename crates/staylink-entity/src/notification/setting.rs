//! Per-user notification settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staylink_core::types::UserId;

/// Per-user toggles for the non-realtime channels.
///
/// Realtime delivery is never gated by settings; it is always attempted
/// first when the user is online.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationSetting {
    /// The user these settings belong to.
    pub user_id: UserId,
    /// Whether push delivery is enabled.
    pub send_push: bool,
    /// Whether bot-relay delivery is enabled.
    pub send_bot_relay: bool,
    /// Last time the settings changed.
    pub updated_at: DateTime<Utc>,
}

impl NotificationSetting {
    /// Defaults applied when a user has never saved settings: both
    /// fallback channels disabled.
    pub fn disabled(user_id: UserId) -> Self {
        Self {
            user_id,
            send_push: false,
            send_bot_relay: false,
            updated_at: Utc::now(),
        }
    }
}
