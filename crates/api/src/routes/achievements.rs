use axum::routing::{get, post};
use axum::Router;

use crate::handlers::achievements;
use crate::state::AppState;

/// Routes mounted at `/achievements`.
///
/// ```text
/// GET    /              -> list_catalog
/// GET    /mine          -> list_mine
/// POST   /check         -> check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(achievements::list_catalog))
        .route("/mine", get(achievements::list_mine))
        .route("/check", post(achievements::check))
}
