//! Challenge entity model and DTOs.

use chrono::NaiveDate;
use habitforge_core::community::ChallengeStatus;
use habitforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A challenge row with its current participant count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Challenge {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub duration_days: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub difficulty: String,
    pub status: String,
    pub max_participants: i32,
    pub participant_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Challenge {
    /// Status implied by the dates on `today`, unless cancelled.
    pub fn current_status(&self, today: NaiveDate) -> ChallengeStatus {
        ChallengeStatus::effective(&self.status, self.start_date, self.end_date, today)
    }
}

/// Insert DTO; dates and status are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateChallenge {
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub duration_days: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub difficulty: String,
    pub status: String,
    pub max_participants: i32,
}

/// Result of a join attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
    Full,
    NotJoinable(ChallengeStatus),
    NotFound,
}
