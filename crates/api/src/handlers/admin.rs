//! Admin-only handlers: platform counts, user management and batch habit
//! operations. Every handler takes [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use habitforge_core::error::CoreError;
use habitforge_core::habits::HabitStatus;
use habitforge_core::types::DbId;
use habitforge_db::models::stats::{AdminUserRow, PlatformStats};
use habitforge_db::repositories::{HabitRepo, SessionRepo, StatsRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on ids accepted by one batch request.
const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct BatchStatusRequest {
    pub ids: Vec<DbId>,
    pub status: HabitStatus,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub affected: u64,
}

fn validate_batch(ids: &[DbId]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }
    if ids.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_BATCH_SIZE} ids per batch"
        )));
    }
    Ok(())
}

/// GET /api/v1/admin/stats
pub async fn platform_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlatformStats>>> {
    let stats = StatsRepo::platform(&state.pool, Utc::now().date_naive()).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/v1/admin/users?limit=&offset=
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<AdminUserRow>>>> {
    let users = UserRepo::list_for_admin(&state.pool, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse::new(users)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivates the account and revokes its refresh sessions.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, revoked, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/habits/batch-delete
pub async fn batch_delete_habits(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BatchDeleteRequest>,
) -> AppResult<Json<DataResponse<BatchResponse>>> {
    validate_batch(&input.ids)?;
    let affected = HabitRepo::batch_delete(&state.pool, &input.ids).await?;
    tracing::info!(admin_id = admin.user_id, affected, "Batch habit delete");
    Ok(Json(DataResponse::new(BatchResponse { affected })))
}

/// POST /api/v1/admin/habits/batch-status
pub async fn batch_update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BatchStatusRequest>,
) -> AppResult<Json<DataResponse<BatchResponse>>> {
    validate_batch(&input.ids)?;
    let affected = HabitRepo::batch_update_status(&state.pool, &input.ids, input.status).await?;
    tracing::info!(
        admin_id = admin.user_id,
        affected,
        status = input.status.as_str(),
        "Batch habit status update"
    );
    Ok(Json(DataResponse::new(BatchResponse { affected })))
}
