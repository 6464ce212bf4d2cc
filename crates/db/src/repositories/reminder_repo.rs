//! Repository for the `reminders` table.

use chrono::NaiveDate;
use habitforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::reminder::{NewReminder, Reminder, ScheduledReminder, UpdateReminder};

const COLUMNS: &str = "id, user_id, habit_id, time_of_day, days_of_week, message, \
                        utc_offset_minutes, is_enabled, last_fired_on, created_at, updated_at";

pub struct ReminderRepo;

impl ReminderRepo {
    pub async fn create(pool: &PgPool, input: &NewReminder<'_>) -> Result<Reminder, sqlx::Error> {
        let query = format!(
            "INSERT INTO reminders
                (user_id, habit_id, time_of_day, days_of_week, message, utc_offset_minutes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(input.user_id)
            .bind(input.habit_id)
            .bind(input.time_of_day)
            .bind(input.days_of_week)
            .bind(input.message)
            .bind(input.utc_offset_minutes)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Reminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reminders WHERE user_id = $1 ORDER BY time_of_day, id"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a reminder the user owns. Changing the schedule clears the
    /// watermark so a moved reminder can fire later the same day.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateReminder,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "UPDATE reminders SET
                time_of_day = COALESCE($3, time_of_day),
                days_of_week = COALESCE($4, days_of_week),
                message = COALESCE($5, message),
                utc_offset_minutes = COALESCE($6, utc_offset_minutes),
                is_enabled = COALESCE($7, is_enabled),
                last_fired_on = CASE WHEN $3 IS NULL AND $4 IS NULL AND $6 IS NULL
                                     THEN last_fired_on ELSE NULL END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.time_of_day)
            .bind(&input.days_of_week)
            .bind(&input.message)
            .bind(input.utc_offset_minutes)
            .bind(input.is_enabled)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Enabled reminders of active users, with the owner's preferences.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<ScheduledReminder>, sqlx::Error> {
        sqlx::query_as::<_, ScheduledReminder>(
            "SELECT r.id, r.user_id, r.habit_id, r.time_of_day, r.days_of_week, r.message,
                    r.utc_offset_minutes, r.is_enabled, r.last_fired_on, r.created_at,
                    r.updated_at, u.preferences
             FROM reminders r
             JOIN users u ON u.id = r.user_id
             WHERE r.is_enabled = true AND u.is_active = true",
        )
        .fetch_all(pool)
        .await
    }

    /// Move the watermark to `today` unless it is already there.
    ///
    /// Returns `true` for exactly one caller per reminder and local day.
    pub async fn try_advance_watermark(
        pool: &PgPool,
        id: DbId,
        today: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reminders SET last_fired_on = $2
             WHERE id = $1 AND (last_fired_on IS NULL OR last_fired_on < $2)",
        )
        .bind(id)
        .bind(today)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
