//! Bot-relay chat link entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use staylink_core::types::UserId;

/// A user's linked bot-relay chat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BotLink {
    /// The owning user.
    pub user_id: UserId,
    /// The relay chat identifier.
    pub chat_id: String,
    /// When the link was established.
    pub created_at: DateTime<Utc>,
}
