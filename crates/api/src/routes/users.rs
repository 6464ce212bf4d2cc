//! Route definitions for the caller's profile.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me            -> get_me
/// PUT    /me            -> update_me
/// GET    /me/level      -> get_level
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/me/level", get(users::get_level))
}
