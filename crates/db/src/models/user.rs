//! User entity model and DTOs.

use habitforge_core::account::UserPreferences;
use habitforge_core::leveling::{calculate_user_level, UserLevel};
use habitforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash. Never serialize this directly; use
/// [`UserResponse`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub account_tier: String,
    pub points: i64,
    pub badges: Vec<String>,
    pub accountability_score: i32,
    pub preferences: Json<UserPreferences>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses, with the derived level.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub account_tier: String,
    pub points: i64,
    pub level: UserLevel,
    pub badges: Vec<String>,
    pub accountability_score: i32,
    pub preferences: UserPreferences,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            account_tier: user.account_tier,
            level: calculate_user_level(user.points),
            points: user.points,
            badges: user.badges,
            accountability_score: user.accountability_score,
            preferences: user.preferences.0,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The email must already be normalized.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
}

/// Self-service profile update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub preferences: Option<UserPreferences>,
}

/// One leaderboard row.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub id: DbId,
    pub display_name: String,
    pub points: i64,
    pub badges: Vec<String>,
}
