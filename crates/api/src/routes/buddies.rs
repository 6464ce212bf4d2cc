use axum::routing::{get, post};
use axum::Router;

use crate::handlers::buddies;
use crate::state::AppState;

/// Routes mounted at `/buddies`.
///
/// ```text
/// GET    /                      -> list_buddies
/// GET    /matches               -> find_matches
/// GET    /requests              -> list_requests (incoming, pending)
/// POST   /requests              -> send_request
/// POST   /requests/{id}/accept  -> accept_request
/// POST   /requests/{id}/decline -> decline_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(buddies::list_buddies))
        .route("/matches", get(buddies::find_matches))
        .route(
            "/requests",
            get(buddies::list_requests).post(buddies::send_request),
        )
        .route("/requests/{id}/accept", post(buddies::accept_request))
        .route("/requests/{id}/decline", post(buddies::decline_request))
}
