//! Route definitions for the `/habits` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::habits;
use crate::state::AppState;

/// Routes mounted at `/habits`.
///
/// ```text
/// GET    /                  -> list_habits (?status, include_archived)
/// POST   /                  -> create_habit
/// GET    /{id}              -> get_habit
/// PUT    /{id}              -> update_habit
/// DELETE /{id}              -> delete_habit
/// PUT    /{id}/status       -> update_status
/// POST   /{id}/complete     -> complete_habit
/// GET    /{id}/entries      -> list_entries (?limit, offset)
/// GET    /{id}/analysis     -> analyze_habit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(habits::list_habits).post(habits::create_habit))
        .route(
            "/{id}",
            get(habits::get_habit)
                .put(habits::update_habit)
                .delete(habits::delete_habit),
        )
        .route("/{id}/status", put(habits::update_status))
        .route("/{id}/complete", post(habits::complete_habit))
        .route("/{id}/entries", get(habits::list_entries))
        .route("/{id}/analysis", get(habits::analyze_habit))
}
