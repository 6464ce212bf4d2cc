//! Request handlers, one module per resource.
//!
//! Handlers validate input with the `habitforge_core` rules, delegate to
//! the `habitforge_db` repositories and map errors via [`AppError`].

pub mod achievements;
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod buddies;
pub mod challenges;
pub mod habits;
pub mod notifications;
pub mod reminders;
pub mod users;

use habitforge_core::error::CoreError;
use habitforge_core::types::DbId;
use habitforge_db::models::user::User;
use habitforge_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load the caller's row; a token for a missing or deactivated user is 401.
pub(crate) async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    match UserRepo::find_by_id(&state.pool, user_id).await? {
        Some(user) if user.is_active => Ok(user),
        Some(_) => Err(AppError::Core(CoreError::Unauthorized(
            "Account is deactivated".into(),
        ))),
        None => Err(AppError::Core(CoreError::Unauthorized(
            "User no longer exists".into(),
        ))),
    }
}
