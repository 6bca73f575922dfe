//! Notification delivery channel enumeration.

use serde::{Deserialize, Serialize};

/// The single channel a notification was delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_channel", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationChannel {
    /// Delivered over an open realtime session.
    Realtime,
    /// Delivered to a mobile push token.
    Push,
    /// Delivered through the bot relay.
    Bot,
}

impl NotificationChannel {
    /// Wire/display name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realtime => "REALTIME",
            Self::Push => "PUSH",
            Self::Bot => "BOT",
        }
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
