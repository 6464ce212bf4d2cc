//! Achievement checks and the local-day helpers shared by handlers.

use chrono::NaiveDate;
use habitforge_core::achievements::{self, Achievement, UserStatsSnapshot};
use habitforge_core::clock;
use habitforge_core::notifications::EVENT_ACHIEVEMENT_UNLOCKED;
use habitforge_core::types::Timestamp;
use habitforge_db::models::achievement::UserAchievement;
use habitforge_db::models::user::User;
use habitforge_db::repositories::{AchievementRepo, HabitRepo};
use habitforge_events::DomainEvent;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// The user's local calendar date at `now`.
pub fn local_today(user: &User, now: Timestamp) -> NaiveDate {
    clock::to_local(now, user.preferences.utc_offset_minutes).date()
}

/// A newly unlocked achievement as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    #[serde(flatten)]
    pub achievement: &'static Achievement,
    pub unlocked_at: Timestamp,
}

/// Evaluate the catalog for `user` and persist any new unlocks.
///
/// Each unlock awards points in the same transaction as the insert, so a
/// concurrent check cannot award twice. One `achievement.unlocked` event is
/// published per row actually inserted.
pub async fn check_achievements(
    state: &AppState,
    user: &User,
    now: Timestamp,
) -> AppResult<Vec<UnlockedAchievement>> {
    let today = local_today(user, now);
    let stats = HabitRepo::stats_for_user(&state.pool, user.id, today).await?;
    let unlocked = AchievementRepo::unlocked_ids(&state.pool, user.id).await?;

    let snapshot = UserStatsSnapshot {
        max_streak: stats.max_streak,
        habit_count: stats.habit_count,
        today_completion_rate: stats.today_completion_rate(),
        hour_of_day: clock::local_hour(now, user.preferences.utc_offset_minutes),
    };

    let candidates = achievements::evaluate(&snapshot, unlocked.iter().map(String::as_str));
    let mut newly_unlocked = Vec::with_capacity(candidates.len());

    for achievement in candidates {
        let metadata = serde_json::to_value(snapshot).unwrap_or_default();
        let Some(row) = AchievementRepo::unlock(&state.pool, user.id, achievement, &metadata).await?
        else {
            continue;
        };

        tracing::info!(
            user_id = user.id,
            achievement_id = achievement.id,
            points = achievement.points,
            "Achievement unlocked"
        );
        publish_unlock(state, &row, achievement);
        newly_unlocked.push(UnlockedAchievement {
            achievement,
            unlocked_at: row.unlocked_at,
        });
    }

    Ok(newly_unlocked)
}

fn publish_unlock(state: &AppState, row: &UserAchievement, achievement: &Achievement) {
    state.event_bus.publish(
        DomainEvent::new(EVENT_ACHIEVEMENT_UNLOCKED)
            .with_source("user_achievement", row.id)
            .with_actor(row.user_id)
            .with_recipient(row.user_id)
            .with_payload(serde_json::json!({
                "achievement_id": achievement.id,
                "name": achievement.name,
                "description": achievement.description,
                "icon": achievement.icon,
                "points": achievement.points,
            })),
    );
}
