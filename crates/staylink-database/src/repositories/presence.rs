//! Presence repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use staylink_core::error::{AppError, ErrorKind};
use staylink_core::result::AppResult;
use staylink_core::types::UserId;

use crate::store::PresenceStore;

/// sqlx-backed implementation of [`PresenceStore`].
#[derive(Debug, Clone)]
pub struct PresenceRepository {
    pool: PgPool,
}

impl PresenceRepository {
    /// Create a new presence repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceStore for PresenceRepository {
    async fn persist_last_seen(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        // GREATEST keeps the stored value monotonically non-decreasing even
        // when transitions race.
        sqlx::query(
            "INSERT INTO user_presence (user_id, last_seen_at) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE \
             SET last_seen_at = GREATEST(user_presence.last_seen_at, EXCLUDED.last_seen_at)",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to persist last seen", e))?;
        Ok(())
    }

    async fn last_seen(&self, user_id: UserId) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar("SELECT last_seen_at FROM user_presence WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load last seen", e))
    }
}
