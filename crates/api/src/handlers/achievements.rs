//! Handlers for the `/achievements` resource.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use habitforge_core::achievements::{self, Achievement};
use habitforge_core::types::Timestamp;
use habitforge_db::models::achievement::UserAchievement;
use habitforge_db::repositories::AchievementRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::gamification::{check_achievements, UnlockedAchievement};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A catalog entry with the caller's unlock state.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub achievement: &'static Achievement,
    pub unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub unlocked: Vec<UnlockedAchievement>,
    pub total_points: i64,
}

/// GET /api/v1/achievements
pub async fn list_catalog(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CatalogEntry>>>> {
    let mine = AchievementRepo::list_for_user(&state.pool, auth.user_id).await?;
    let unlocked_at: HashMap<&str, Timestamp> = mine
        .iter()
        .map(|row| (row.achievement_id.as_str(), row.unlocked_at))
        .collect();

    let entries = achievements::CATALOG
        .iter()
        .map(|achievement| {
            let at = unlocked_at.get(achievement.id).copied();
            CatalogEntry {
                achievement,
                unlocked: at.is_some(),
                unlocked_at: at,
            }
        })
        .collect();

    Ok(Json(DataResponse::new(entries)))
}

/// GET /api/v1/achievements/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserAchievement>>>> {
    let rows = AchievementRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(rows)))
}

/// POST /api/v1/achievements/check
///
/// Evaluates the catalog against the caller's current stats. Running it
/// again with unchanged stats unlocks nothing.
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CheckResponse>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let unlocked = check_achievements(&state, &user, Utc::now()).await?;

    let awarded: i64 = unlocked.iter().map(|u| u.achievement.points).sum();
    Ok(Json(DataResponse::new(CheckResponse {
        total_points: user.points + awarded,
        unlocked,
    })))
}
