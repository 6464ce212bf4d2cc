//! Platform-wide aggregates for the admin API.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::stats::PlatformStats;

pub struct StatsRepo;

impl StatsRepo {
    pub async fn platform(pool: &PgPool, today: NaiveDate) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE is_active = true) AS active_users,
                (SELECT COUNT(*) FROM habits) AS total_habits,
                (SELECT COUNT(*) FROM habits WHERE status = 'active') AS active_habits,
                (SELECT COUNT(*) FROM tracking_entries WHERE completed_on = $1)
                    AS completions_today,
                (SELECT COUNT(*) FROM user_achievements) AS achievements_unlocked,
                (SELECT COUNT(*) FROM challenges WHERE status IN ('upcoming', 'active'))
                    AS open_challenges",
        )
        .bind(today)
        .fetch_one(pool)
        .await
    }
}
