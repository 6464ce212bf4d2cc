//! Repository for the `habits` table.

use chrono::NaiveDate;
use habitforge_core::habits::HabitStatus;
use habitforge_core::rope::RopeState;
use habitforge_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::habit::{CreateHabit, Habit, HabitProgress, UpdateHabit};
use crate::models::stats::HabitStats;
use crate::models::tracking::{CreateTrackingEntry, TrackingEntry};
use crate::repositories::tracking_repo::TrackingRepo;

const COLUMNS: &str = "id, user_id, title, description, category, habit_type, frequency, \
                        status, current_streak, longest_streak, total_completions, \
                        last_completed_on, completion_rate, rope, milestones, \
                        created_at, updated_at";

pub struct HabitRepo;

impl HabitRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateHabit,
    ) -> Result<Habit, sqlx::Error> {
        let query = format!(
            "INSERT INTO habits (user_id, title, description, category, habit_type, frequency, rope)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(input.habit_type.as_str())
            .bind(Json(&input.frequency))
            .bind(Json(RopeState::default()))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE id = $1");
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a habit owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's habits, newest first.
    ///
    /// Archived habits are hidden unless `include_archived` is set or the
    /// `status` filter asks for them explicitly.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<HabitStatus>,
        include_archived: bool,
    ) -> Result<Vec<Habit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM habits
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3 OR $2::TEXT IS NOT NULL OR status <> 'archived')
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .bind(include_archived)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the habit is not the user's.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateHabit,
    ) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!(
            "UPDATE habits SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                habit_type = COALESCE($6, habit_type),
                frequency = COALESCE($7, frequency)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.habit_type.map(|t| t.as_str()))
            .bind(input.frequency.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        status: HabitStatus,
    ) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!(
            "UPDATE habits SET status = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a habit and, by cascade, its entries and reminders.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a completion: the new counters and the tracking entry, in
    /// one transaction.
    ///
    /// The counter update is guarded on the `last_completed_on` value the
    /// progress was computed from. Returns `None` when another request
    /// completed the habit in between; nothing is written in that case.
    pub async fn record_completion(
        pool: &PgPool,
        habit: &Habit,
        progress: &HabitProgress,
        entry: &CreateTrackingEntry,
    ) -> Result<Option<(Habit, TrackingEntry)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE habits SET
                current_streak = $3,
                longest_streak = $4,
                total_completions = $5,
                last_completed_on = $6,
                completion_rate = $7,
                rope = $8,
                milestones = $9
             WHERE id = $1 AND last_completed_on IS NOT DISTINCT FROM $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Habit>(&query)
            .bind(habit.id)
            .bind(habit.last_completed_on)
            .bind(progress.streak.current_streak)
            .bind(progress.streak.longest_streak)
            .bind(progress.streak.total_completions)
            .bind(progress.streak.last_completed_on)
            .bind(progress.completion_rate)
            .bind(Json(&progress.rope))
            .bind(Json(&progress.milestones))
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        let entry = TrackingRepo::insert(&mut *tx, entry).await?;
        tx.commit().await?;
        Ok(Some((updated, entry)))
    }

    /// Aggregates used for achievement checks and the dashboard.
    pub async fn stats_for_user(
        pool: &PgPool,
        user_id: DbId,
        today: NaiveDate,
    ) -> Result<HabitStats, sqlx::Error> {
        sqlx::query_as::<_, HabitStats>(
            "SELECT
                COUNT(*) FILTER (WHERE status <> 'archived') AS habit_count,
                COUNT(*) FILTER (WHERE status = 'active') AS active_count,
                COUNT(*) FILTER (WHERE status = 'active' AND last_completed_on = $2)
                    AS completed_today,
                COALESCE(MAX(current_streak) FILTER (
                    WHERE status = 'active' AND last_completed_on >= $2 - 1), 0) AS max_streak,
                COALESCE(MAX(longest_streak), 0) AS longest_streak_ever
             FROM habits
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(pool)
        .await
    }

    /// Distinct categories of the user's non-archived habits.
    pub async fn categories_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT category FROM habits
             WHERE user_id = $1 AND status <> 'archived'
             ORDER BY category",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete many habits regardless of owner. Returns the count deleted.
    pub async fn batch_delete(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Set the status of many habits regardless of owner.
    pub async fn batch_update_status(
        pool: &PgPool,
        ids: &[DbId],
        status: HabitStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE habits SET status = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
