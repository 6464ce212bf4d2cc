//! Handlers for the `/challenges` resource.
//!
//! A challenge's status is derived from its dates on every read; only a
//! cancellation is taken from the stored row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use habitforge_core::community::{
    self, ChallengeDifficulty, ChallengeStatus, DEFAULT_MAX_PARTICIPANTS,
};
use habitforge_core::error::CoreError;
use habitforge_core::habits::{validate_description, HabitCategory};
use habitforge_core::notifications::EVENT_CHALLENGE_JOINED;
use habitforge_core::types::DbId;
use habitforge_db::models::challenge::{Challenge, CreateChallenge, JoinOutcome};
use habitforge_db::repositories::ChallengeRepo;
use habitforge_events::DomainEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::gamification::local_today;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChallengeListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: HabitCategory,
    pub duration_days: i32,
    /// Defaults to the creator's local today.
    pub start_date: Option<NaiveDate>,
    #[serde(default = "default_difficulty")]
    pub difficulty: ChallengeDifficulty,
    pub max_participants: Option<i32>,
}

fn default_difficulty() -> ChallengeDifficulty {
    ChallengeDifficulty::Medium
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Challenge",
        id,
    })
}

fn server_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Replace the stored status with the one the dates imply on `today`.
fn present(mut challenge: Challenge, today: NaiveDate) -> Challenge {
    challenge.status = challenge.current_status(today).as_str().to_string();
    challenge
}

/// GET /api/v1/challenges?status=&limit=&offset=
pub async fn list_challenges(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ChallengeListQuery>,
) -> AppResult<Json<DataResponse<Vec<Challenge>>>> {
    let status = params
        .status
        .as_deref()
        .map(ChallengeStatus::from_str_db)
        .transpose()?;
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let today = server_today();

    let challenges =
        ChallengeRepo::list(&state.pool, status, today, page.limit(), page.offset()).await?;
    let data = challenges.into_iter().map(|c| present(c, today)).collect();
    Ok(Json(DataResponse::new(data)))
}

/// POST /api/v1/challenges
///
/// The creator is enrolled as the first participant.
pub async fn create_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateChallengeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Challenge>>)> {
    community::validate_title(&input.title)?;
    validate_description(input.description.as_deref())?;
    community::validate_duration(input.duration_days)?;
    let max_participants = input.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
    community::validate_max_participants(max_participants)?;

    let user = super::load_user(&state, auth.user_id).await?;
    let today = local_today(&user, Utc::now());
    let start_date = input.start_date.unwrap_or(today);
    if start_date < today {
        return Err(AppError::Core(CoreError::Validation(
            "start_date cannot be in the past".into(),
        )));
    }
    let end_date = community::end_date(start_date, input.duration_days);

    let challenge = ChallengeRepo::create(
        &state.pool,
        &CreateChallenge {
            creator_id: auth.user_id,
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category.as_str().to_string(),
            duration_days: input.duration_days,
            start_date,
            end_date,
            difficulty: input.difficulty.as_str().to_string(),
            status: ChallengeStatus::from_dates(start_date, end_date, today)
                .as_str()
                .to_string(),
            max_participants,
        },
    )
    .await?;

    tracing::info!(challenge_id = challenge.id, creator_id = auth.user_id, "Challenge created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(present(challenge, today))),
    ))
}

/// GET /api/v1/challenges/{id}
pub async fn get_challenge(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Challenge>>> {
    let challenge = ChallengeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(present(challenge, server_today()))))
}

/// DELETE /api/v1/challenges/{id}
///
/// Only the creator or an admin may delete.
pub async fn delete_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let challenge = ChallengeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if challenge.creator_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the creator can delete this challenge".into(),
        )));
    }

    ChallengeRepo::delete(&state.pool, id).await?;
    tracing::info!(challenge_id = id, user_id = auth.user_id, "Challenge deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/challenges/{id}/join
pub async fn join_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Challenge>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let today = local_today(&user, Utc::now());

    match ChallengeRepo::join(&state.pool, id, auth.user_id, today).await? {
        JoinOutcome::Joined => {}
        JoinOutcome::AlreadyJoined => {
            return Err(AppError::Core(CoreError::Conflict(
                "Already joined this challenge".into(),
            )))
        }
        JoinOutcome::Full => {
            return Err(AppError::Core(CoreError::Conflict(
                "Challenge is full".into(),
            )))
        }
        JoinOutcome::NotJoinable(status) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Challenge is {status} and cannot be joined"
            ))))
        }
        JoinOutcome::NotFound => return Err(not_found(id)),
    }

    let challenge = ChallengeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if challenge.creator_id != auth.user_id {
        state.event_bus.publish(
            DomainEvent::new(EVENT_CHALLENGE_JOINED)
                .with_source("challenge", challenge.id)
                .with_actor(auth.user_id)
                .with_recipient(challenge.creator_id)
                .with_payload(serde_json::json!({
                    "challenge_id": challenge.id,
                    "title": challenge.title,
                    "display_name": user.display_name,
                })),
        );
    }

    Ok(Json(DataResponse::new(present(challenge, today))))
}

/// POST /api/v1/challenges/{id}/leave
pub async fn leave_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ChallengeRepo::leave(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::Validation(
            "You are not a participant of this challenge".into(),
        )))
    }
}
