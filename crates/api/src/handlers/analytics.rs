//! Handler for the personal analytics dashboard.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use habitforge_core::leveling::{calculate_user_level, UserLevel};
use habitforge_db::repositories::{AchievementRepo, HabitRepo, TrackingRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::gamification::local_today;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Days covered by `completions_last_7_days`, today included.
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_habits: i64,
    pub active_habits: i64,
    pub completed_today: i64,
    pub today_completion_rate: f64,
    pub best_current_streak: i32,
    pub longest_streak_ever: i32,
    pub completions_last_7_days: i64,
    pub points: i64,
    pub level: UserLevel,
    pub achievements_unlocked: i64,
}

/// GET /api/v1/analytics/dashboard
///
/// All day boundaries follow the caller's configured UTC offset.
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let today = local_today(&user, Utc::now());

    let stats = HabitRepo::stats_for_user(&state.pool, user.id, today).await?;
    let since = today - Duration::days(RECENT_WINDOW_DAYS - 1);
    let recent = TrackingRepo::count_since(&state.pool, user.id, since).await?;
    let achievements = AchievementRepo::count_for_user(&state.pool, user.id).await?;

    Ok(Json(DataResponse::new(Dashboard {
        total_habits: stats.habit_count,
        active_habits: stats.active_count,
        completed_today: stats.completed_today,
        today_completion_rate: stats.today_completion_rate(),
        best_current_streak: stats.max_streak,
        longest_streak_ever: stats.longest_streak_ever,
        completions_last_7_days: recent,
        points: user.points,
        level: calculate_user_level(user.points),
        achievements_unlocked: achievements,
    })))
}
