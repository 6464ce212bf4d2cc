//! Handlers for the `/reminders` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use habitforge_core::clock::validate_utc_offset;
use habitforge_core::error::CoreError;
use habitforge_core::reminders::{validate_days_of_week, validate_message};
use habitforge_core::types::DbId;
use habitforge_db::models::reminder::{CreateReminder, NewReminder, Reminder, UpdateReminder};
use habitforge_db::repositories::{HabitRepo, ReminderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Reminder",
        id,
    })
}

/// GET /api/v1/reminders
pub async fn list_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Reminder>>>> {
    let reminders = ReminderRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(reminders)))
}

/// POST /api/v1/reminders
///
/// Without an explicit `utc_offset_minutes` the reminder follows the
/// offset in the caller's preferences at creation time.
pub async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateReminder>,
) -> AppResult<(StatusCode, Json<DataResponse<Reminder>>)> {
    validate_message(&input.message)?;
    validate_days_of_week(&input.days_of_week)?;

    if let Some(habit_id) = input.habit_id {
        HabitRepo::find_for_user(&state.pool, habit_id, auth.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Habit",
                id: habit_id,
            }))?;
    }

    let utc_offset_minutes = match input.utc_offset_minutes {
        Some(offset) => offset,
        None => {
            super::load_user(&state, auth.user_id)
                .await?
                .preferences
                .utc_offset_minutes
        }
    };
    validate_utc_offset(utc_offset_minutes)?;

    let mut days = input.days_of_week.clone();
    days.sort_unstable();
    days.dedup();

    let reminder = ReminderRepo::create(
        &state.pool,
        &NewReminder {
            user_id: auth.user_id,
            habit_id: input.habit_id,
            time_of_day: input.time_of_day,
            days_of_week: &days,
            message: input.message.trim(),
            utc_offset_minutes,
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, reminder_id = reminder.id, "Reminder created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(reminder))))
}

/// PUT /api/v1/reminders/{id}
pub async fn update_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReminder>,
) -> AppResult<Json<DataResponse<Reminder>>> {
    if let Some(message) = &input.message {
        validate_message(message)?;
    }
    if let Some(days) = &input.days_of_week {
        validate_days_of_week(days)?;
    }
    if let Some(offset) = input.utc_offset_minutes {
        validate_utc_offset(offset)?;
    }

    let reminder = ReminderRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(reminder)))
}

/// DELETE /api/v1/reminders/{id}
pub async fn delete_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ReminderRepo::delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
