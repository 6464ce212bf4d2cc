pub mod achievements;
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod buddies;
pub mod challenges;
pub mod habits;
pub mod health;
pub mod notifications;
pub mod reminders;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=                                 WebSocket notification push
///
/// /auth/signup                               sign up (public)
/// /auth/login                                login (public)
/// /auth/refresh                              refresh (public)
/// /auth/logout                               logout
/// /auth/me                                   current profile
///
/// /users/me                                  get, update profile
/// /users/me/level                            level breakdown
/// /leaderboard                               top users by points (?limit)
///
/// /habits                                    list, create
/// /habits/{id}                               get, update, delete
/// /habits/{id}/status                        status transition (PUT)
/// /habits/{id}/complete                      record today's completion (POST)
/// /habits/{id}/entries                       tracking history
/// /habits/{id}/analysis                      five-factor breakdown
///
/// /achievements                              catalog with unlocked flags
/// /achievements/mine                         unlocked achievements
/// /achievements/check                        evaluate and unlock (POST)
///
/// /notifications                             list (?unread_only, limit, offset)
/// /notifications/unread-count                unread count
/// /notifications/read-all                    mark all read (POST)
/// /notifications/{id}/read                   mark read (POST)
/// /notifications/{id}                        delete
///
/// /reminders                                 list, create
/// /reminders/{id}                            update, delete
///
/// /challenges                                list (?status), create
/// /challenges/{id}                           get, delete
/// /challenges/{id}/join                      join (POST)
/// /challenges/{id}/leave                     leave (POST)
///
/// /buddies                                   accepted buddies
/// /buddies/matches                           scored candidates
/// /buddies/requests                          incoming, send
/// /buddies/requests/{id}/accept              accept (POST)
/// /buddies/requests/{id}/decline             decline (POST)
///
/// /analytics/dashboard                       summary stats
///
/// /admin/stats                               platform counts (admin only)
/// /admin/users                               list users (admin only)
/// /admin/users/{id}                          deactivate (admin only)
/// /admin/habits/batch-delete                 batch delete (admin only)
/// /admin/habits/batch-status                 batch status (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .route("/leaderboard", get(handlers::users::leaderboard))
        .nest("/habits", habits::router())
        .nest("/achievements", achievements::router())
        .nest("/notifications", notifications::router())
        .nest("/reminders", reminders::router())
        .nest("/challenges", challenges::router())
        .nest("/buddies", buddies::router())
        .nest("/analytics", analytics::router())
        .nest("/admin", admin::router())
}
