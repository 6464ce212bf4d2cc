//! Handlers for the caller's profile, level and the leaderboard.

use axum::extract::{Query, State};
use axum::Json;
use habitforge_core::account::validate_display_name;
use habitforge_core::error::CoreError;
use habitforge_core::leveling::{calculate_user_level, UserLevel};
use habitforge_core::types::DbId;
use habitforge_db::models::user::{UpdateProfile, UserResponse};
use habitforge_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: DbId,
    pub display_name: String,
    pub points: i64,
    pub level: i64,
    pub badges: Vec<String>,
}

/// Level breakdown plus progress through the current level.
#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub points: i64,
    #[serde(flatten)]
    pub level: UserLevel,
    pub progress: f64,
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    Ok(Json(DataResponse::new(user.into())))
}

/// PUT /api/v1/users/me
///
/// Updates the display name and/or replaces the preferences object.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let display_name = input.display_name.as_deref().map(str::trim);
    if let Some(name) = display_name {
        validate_display_name(name)?;
    }
    if let Some(prefs) = &input.preferences {
        prefs.validate()?;
    }

    let user = UserRepo::update_profile(
        &state.pool,
        auth.user_id,
        display_name,
        input.preferences.as_ref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    }))?;

    Ok(Json(DataResponse::new(user.into())))
}

/// GET /api/v1/users/me/level
pub async fn get_level(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<LevelResponse>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let level = calculate_user_level(user.points);
    Ok(Json(DataResponse::new(LevelResponse {
        points: user.points,
        progress: level.progress(),
        level,
    })))
}

/// GET /api/v1/leaderboard?limit=
pub async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<LeaderboardQuery>,
) -> AppResult<Json<DataResponse<Vec<LeaderboardEntry>>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let rows = UserRepo::leaderboard(&state.pool, limit).await?;
    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            rank: i + 1,
            user_id: row.id,
            display_name: row.display_name,
            level: calculate_user_level(row.points).level,
            points: row.points,
            badges: row.badges,
        })
        .collect();

    Ok(Json(DataResponse::new(entries)))
}
