//! Repository for the `tracking_entries` table.

use chrono::NaiveDate;
use habitforge_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::tracking::{CreateTrackingEntry, TrackingEntry};

const COLUMNS: &str = "id, habit_id, user_id, completed_on, tracked_at, location, \
                        emotional_state, people_present, time_of_day, preceding_action, \
                        notes, duration_minutes";

pub struct TrackingRepo;

impl TrackingRepo {
    /// Insert an entry. At most one entry exists per habit and day
    /// (`uq_tracking_entries_habit_day`).
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateTrackingEntry,
    ) -> Result<TrackingEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracking_entries
                (habit_id, user_id, completed_on, location, emotional_state, people_present,
                 time_of_day, preceding_action, notes, duration_minutes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let factors = &input.factors;
        sqlx::query_as::<_, TrackingEntry>(&query)
            .bind(input.habit_id)
            .bind(input.user_id)
            .bind(input.completed_on)
            .bind(&factors.location)
            .bind(&factors.emotional_state)
            .bind(&factors.people_present)
            .bind(&factors.time_of_day)
            .bind(&factors.preceding_action)
            .bind(&input.notes)
            .bind(input.duration_minutes)
            .fetch_one(executor)
            .await
    }

    /// Entries for a habit, most recent first.
    pub async fn list_for_habit(
        pool: &PgPool,
        habit_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackingEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracking_entries
             WHERE habit_id = $1
             ORDER BY completed_on DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TrackingEntry>(&query)
            .bind(habit_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every entry for a habit, for trigger analysis.
    pub async fn all_for_habit(
        pool: &PgPool,
        habit_id: DbId,
    ) -> Result<Vec<TrackingEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracking_entries WHERE habit_id = $1");
        sqlx::query_as::<_, TrackingEntry>(&query)
            .bind(habit_id)
            .fetch_all(pool)
            .await
    }

    /// Number of a user's completions on or after `since`.
    pub async fn count_since(
        pool: &PgPool,
        user_id: DbId,
        since: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tracking_entries WHERE user_id = $1 AND completed_on >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
