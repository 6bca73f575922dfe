//! Mobile push token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use staylink_core::types::UserId;

/// A registered mobile push token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PushToken {
    /// Row identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: UserId,
    /// Opaque provider token.
    pub token: String,
    /// When the token was registered.
    pub created_at: DateTime<Utc>,
}
