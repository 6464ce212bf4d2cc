//! Route definitions for `/admin`.
//!
//! Every handler enforces the admin role through `RequireAdmin`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /stats                 -> platform_stats
/// GET    /users                 -> list_users (?limit, offset)
/// DELETE /users/{id}            -> deactivate_user
/// POST   /habits/batch-delete   -> batch_delete_habits
/// POST   /habits/batch-status   -> batch_update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::platform_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::deactivate_user))
        .route("/habits/batch-delete", post(admin::batch_delete_habits))
        .route("/habits/batch-status", post(admin::batch_update_status))
}
