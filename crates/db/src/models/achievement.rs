//! Unlocked achievement rows. The catalog itself lives in
//! `habitforge_core::achievements`.

use habitforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAchievement {
    pub id: DbId,
    pub user_id: DbId,
    pub achievement_id: String,
    pub points_awarded: i64,
    pub metadata: serde_json::Value,
    pub unlocked_at: Timestamp,
}
