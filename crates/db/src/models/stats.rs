//! Aggregate read models for analytics and administration.

use habitforge_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Per-user habit aggregates for one local day.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct HabitStats {
    /// Non-archived habits.
    pub habit_count: i64,
    pub active_count: i64,
    /// Active habits completed on the given day.
    pub completed_today: i64,
    /// Best streak among active habits that has not lapsed.
    pub max_streak: i32,
    pub longest_streak_ever: i32,
}

impl HabitStats {
    /// Fraction of active habits completed today, `0.0` with no active habits.
    pub fn today_completion_rate(&self) -> f64 {
        if self.active_count == 0 {
            0.0
        } else {
            (self.completed_today as f64 / self.active_count as f64).clamp(0.0, 1.0)
        }
    }
}

/// Platform-wide counts for the admin dashboard.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct PlatformStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_habits: i64,
    pub active_habits: i64,
    pub completions_today: i64,
    pub achievements_unlocked: i64,
    pub open_challenges: i64,
}

/// An admin view of a user row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUserRow {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub points: i64,
    pub is_active: bool,
    pub habit_count: i64,
}
