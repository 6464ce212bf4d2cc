use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET    /dashboard     -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(analytics::dashboard))
}
