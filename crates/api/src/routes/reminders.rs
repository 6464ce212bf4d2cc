use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reminders;
use crate::state::AppState;

/// Routes mounted at `/reminders`.
///
/// ```text
/// GET    /              -> list_reminders
/// POST   /              -> create_reminder
/// PUT    /{id}          -> update_reminder
/// DELETE /{id}          -> delete_reminder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reminders::list_reminders).post(reminders::create_reminder),
        )
        .route(
            "/{id}",
            put(reminders::update_reminder).delete(reminders::delete_reminder),
        )
}
