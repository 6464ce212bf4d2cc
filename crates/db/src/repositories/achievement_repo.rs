//! Repository for the `user_achievements` table.

use habitforge_core::achievements::Achievement;
use habitforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::UserAchievement;

const COLUMNS: &str = "id, user_id, achievement_id, points_awarded, metadata, unlocked_at";

pub struct AchievementRepo;

impl AchievementRepo {
    /// Unlocked achievements for a user, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_achievements
             WHERE user_id = $1
             ORDER BY unlocked_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn unlocked_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT achievement_id FROM user_achievements WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_achievements WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Unlock `achievement` for a user and award its points and badge.
    ///
    /// Runs in one transaction. The insert is `ON CONFLICT DO NOTHING`
    /// against `uq_user_achievements_user_achievement`, and points are only
    /// awarded when this call inserted the row. Returns the new row, or
    /// `None` if the user already had it.
    pub async fn unlock(
        pool: &PgPool,
        user_id: DbId,
        achievement: &Achievement,
        metadata: &serde_json::Value,
    ) -> Result<Option<UserAchievement>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO user_achievements (user_id, achievement_id, points_awarded, metadata)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, achievement_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .bind(achievement.id)
            .bind(achievement.points)
            .bind(metadata)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(inserted) = inserted else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE users SET
                points = points + $2,
                badges = CASE WHEN $3 = ANY(badges) THEN badges ELSE array_append(badges, $3) END
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(achievement.points)
        .bind(achievement.icon)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(inserted))
    }
}
