//! Buddy match models.

use habitforge_core::account::UserPreferences;
use habitforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `buddy_matches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuddyMatch {
    pub id: DbId,
    pub requester_id: DbId,
    pub recipient_id: DbId,
    pub score: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A match seen from one side: the other user plus the match row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuddyView {
    pub match_id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub score: i32,
    pub status: String,
    pub created_at: Timestamp,
}

/// A user who could be matched, with the attributes the score needs.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub user_id: DbId,
    pub display_name: String,
    pub preferences: Json<UserPreferences>,
    pub accountability_score: i32,
    pub categories: Vec<String>,
}
