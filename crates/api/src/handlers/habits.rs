//! Handlers for the `/habits` resource.
//!
//! Every endpoint is scoped to the caller's own habits; another user's
//! habit id is reported as not found. Dates are evaluated in the caller's
//! local day (see [`crate::gamification::local_today`]).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use habitforge_core::clock;
use habitforge_core::error::CoreError;
use habitforge_core::habits::{validate_description, validate_title, HabitStatus};
use habitforge_core::notifications::EVENT_HABIT_MILESTONE;
use habitforge_core::rope::{rope_for, RopeState};
use habitforge_core::streaks::{self, Milestone};
use habitforge_core::tracking::{self, FactorBreakdown, FiveFactors};
use habitforge_core::types::{DbId, Timestamp};
use habitforge_db::models::habit::{CreateHabit, Habit, HabitProgress, UpdateHabit};
use habitforge_db::models::tracking::{CreateTrackingEntry, TrackingEntry};
use habitforge_db::models::user::User;
use habitforge_db::repositories::{HabitRepo, TrackingRepo};
use habitforge_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::gamification::{check_achievements, local_today, UnlockedAchievement};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HabitListQuery {
    pub status: Option<String>,
    pub include_archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: HabitStatus,
}

/// Body of `POST /habits/{id}/complete`. The five factors sit at the top
/// level next to `notes` and `duration_minutes`.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    #[serde(flatten)]
    pub factors: FiveFactors,
    pub notes: Option<String>,
    pub duration_minutes: Option<i32>,
}

/// A habit as shown to its owner on a given local day.
///
/// `current_streak` is the displayed streak, which lapses to zero once a
/// full day has been missed. `completion_rate` and `rope` are derived for
/// the owner's local day at read time, so an idle habit decays.
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub habit_type: String,
    pub frequency: habitforge_core::habits::Frequency,
    pub status: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_completions: i32,
    pub last_completed_on: Option<NaiveDate>,
    pub completed_today: bool,
    pub completion_rate: f64,
    pub rope: RopeState,
    pub milestones: Vec<Milestone>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl HabitResponse {
    pub fn new(habit: Habit, owner: &User, now: Timestamp) -> Self {
        let offset = owner.preferences.utc_offset_minutes;
        let today = local_today(owner, now);
        let created_on = clock::to_local(habit.created_at, offset).date();

        let current_streak =
            streaks::effective_streak(habit.current_streak, habit.last_completed_on, today);
        let completion_rate =
            streaks::completion_rate(habit.total_completions, created_on, today);

        Self {
            id: habit.id,
            current_streak,
            completed_today: streaks::completed_today(habit.last_completed_on, today),
            title: habit.title,
            description: habit.description,
            category: habit.category,
            habit_type: habit.habit_type,
            frequency: habit.frequency.0,
            status: habit.status,
            longest_streak: habit.longest_streak,
            total_completions: habit.total_completions,
            last_completed_on: habit.last_completed_on,
            completion_rate,
            rope: rope_for(current_streak, completion_rate),
            milestones: habit.milestones.0,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub habit: HabitResponse,
    pub entry: TrackingEntry,
    pub new_milestones: Vec<Milestone>,
    pub unlocked_achievements: Vec<UnlockedAchievement>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub habit_id: DbId,
    pub total_entries: usize,
    pub factors: Vec<FactorBreakdown>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Habit", id })
}

async fn owned_habit(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Habit> {
    HabitRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn stored_status(habit: &Habit) -> AppResult<HabitStatus> {
    HabitStatus::from_str_db(&habit.status).map_err(AppError::from)
}

/// Run achievement checks after a habit change without failing the request.
///
/// A failed check is logged and reported as nothing unlocked.
async fn check_achievements_logged(
    state: &AppState,
    user: &User,
    now: Timestamp,
) -> Vec<UnlockedAchievement> {
    check_achievements(state, user, now)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = user.id, error = %e, "Achievement check failed");
            Vec::new()
        })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/habits?status=&include_archived=
pub async fn list_habits(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HabitListQuery>,
) -> AppResult<Json<DataResponse<Vec<HabitResponse>>>> {
    let status = params
        .status
        .as_deref()
        .map(HabitStatus::from_str_db)
        .transpose()?;

    let user = super::load_user(&state, auth.user_id).await?;
    let now = Utc::now();

    let habits = HabitRepo::list_for_user(
        &state.pool,
        auth.user_id,
        status,
        params.include_archived.unwrap_or(false),
    )
    .await?;

    let data = habits
        .into_iter()
        .map(|h| HabitResponse::new(h, &user, now))
        .collect();
    Ok(Json(DataResponse::new(data)))
}

/// POST /api/v1/habits
pub async fn create_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateHabit>,
) -> AppResult<(StatusCode, Json<DataResponse<HabitResponse>>)> {
    validate_title(&input.title)?;
    validate_description(input.description.as_deref())?;
    input.frequency.validate()?;

    let user = super::load_user(&state, auth.user_id).await?;
    let habit = HabitRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, habit_id = habit.id, "Habit created");

    let now = Utc::now();
    check_achievements_logged(&state, &user, now).await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(HabitResponse::new(habit, &user, now))),
    ))
}

/// GET /api/v1/habits/{id}
pub async fn get_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HabitResponse>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let habit = owned_habit(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse::new(HabitResponse::new(habit, &user, Utc::now()))))
}

/// PUT /api/v1/habits/{id}
pub async fn update_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHabit>,
) -> AppResult<Json<DataResponse<HabitResponse>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_description(input.description.as_deref())?;
    if let Some(frequency) = &input.frequency {
        frequency.validate()?;
    }

    let user = super::load_user(&state, auth.user_id).await?;
    let habit = HabitRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(HabitResponse::new(habit, &user, Utc::now()))))
}

/// PUT /api/v1/habits/{id}/status
///
/// Archiving is the soft delete; `DELETE` removes the row for good.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<HabitResponse>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let habit = owned_habit(&state, id, auth.user_id).await?;
    let current = stored_status(&habit)?;
    current.validate_transition(input.status)?;

    let habit = if current == input.status {
        habit
    } else {
        let updated = HabitRepo::set_status(&state.pool, id, auth.user_id, input.status)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(habit_id = id, from = %current, to = %input.status, "Habit status changed");
        updated
    };

    let now = Utc::now();
    check_achievements_logged(&state, &user, now).await;

    Ok(Json(DataResponse::new(HabitResponse::new(habit, &user, now))))
}

/// DELETE /api/v1/habits/{id}
pub async fn delete_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if HabitRepo::delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/habits/{id}/complete
///
/// Records today's completion with its five factors, advances the streak,
/// rope and milestones, then runs the achievement check. A second
/// completion on the same local day is a 409.
pub async fn complete_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteRequest>,
) -> AppResult<Json<DataResponse<CompletionResponse>>> {
    tracking::validate_entry(&input.factors, input.notes.as_deref(), input.duration_minutes)?;

    let user = super::load_user(&state, auth.user_id).await?;
    let habit = owned_habit(&state, id, auth.user_id).await?;

    let status = stored_status(&habit)?;
    if !status.is_trackable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Only active habits can be completed (status is {status})"
        ))));
    }

    let now = Utc::now();
    let offset = user.preferences.utc_offset_minutes;
    let today = local_today(&user, now);
    let created_on = clock::to_local(habit.created_at, offset).date();

    let streak = streaks::record_completion(habit.streak_state(), today)?;
    let completion_rate = streaks::completion_rate(streak.total_completions, created_on, today);
    let reached = streaks::new_milestones(streak.current_streak, &habit.milestones, today);
    let mut milestones = habit.milestones.0.clone();
    milestones.extend(reached.iter().cloned());

    let progress = HabitProgress {
        streak,
        completion_rate,
        rope: rope_for(streak.current_streak, completion_rate),
        milestones,
    };
    let entry = CreateTrackingEntry {
        habit_id: habit.id,
        user_id: auth.user_id,
        completed_on: today,
        factors: input.factors,
        notes: input.notes,
        duration_minutes: input.duration_minutes,
    };

    let (updated, entry) = HabitRepo::record_completion(&state.pool, &habit, &progress, &entry)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Habit already completed today".into())))?;

    tracing::info!(
        habit_id = id,
        user_id = auth.user_id,
        streak = streak.current_streak,
        "Habit completed"
    );

    for milestone in &reached {
        state.event_bus.publish(
            DomainEvent::new(EVENT_HABIT_MILESTONE)
                .with_source("habit", updated.id)
                .with_actor(auth.user_id)
                .with_payload(serde_json::json!({
                    "habit_id": updated.id,
                    "title": updated.title,
                    "days": milestone.days,
                })),
        );
    }

    // The completion is committed at this point.
    let unlocked_achievements = check_achievements_logged(&state, &user, now).await;

    Ok(Json(DataResponse::new(CompletionResponse {
        habit: HabitResponse::new(updated, &user, now),
        entry,
        new_milestones: reached,
        unlocked_achievements,
    })))
}

/// GET /api/v1/habits/{id}/entries?limit=&offset=
pub async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<TrackingEntry>>>> {
    owned_habit(&state, id, auth.user_id).await?;
    let entries = TrackingRepo::list_for_habit(&state.pool, id, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse::new(entries)))
}

/// GET /api/v1/habits/{id}/analysis
pub async fn analyze_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AnalysisResponse>>> {
    owned_habit(&state, id, auth.user_id).await?;
    let entries = TrackingRepo::all_for_habit(&state.pool, id).await?;
    let factors: Vec<FiveFactors> = entries.iter().map(TrackingEntry::factors).collect();

    Ok(Json(DataResponse::new(AnalysisResponse {
        habit_id: id,
        total_entries: entries.len(),
        factors: tracking::analyze(&factors),
    })))
}
