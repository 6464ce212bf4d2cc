//! Route definitions for the `/challenges` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::challenges;
use crate::state::AppState;

/// Routes mounted at `/challenges`.
///
/// ```text
/// GET    /              -> list_challenges (?status, limit, offset)
/// POST   /              -> create_challenge
/// GET    /{id}          -> get_challenge
/// DELETE /{id}          -> delete_challenge (creator or admin)
/// POST   /{id}/join     -> join_challenge
/// POST   /{id}/leave    -> leave_challenge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(challenges::list_challenges).post(challenges::create_challenge),
        )
        .route(
            "/{id}",
            get(challenges::get_challenge).delete(challenges::delete_challenge),
        )
        .route("/{id}/join", post(challenges::join_challenge))
        .route("/{id}/leave", post(challenges::leave_challenge))
}
