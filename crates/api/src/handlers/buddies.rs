//! Handlers for accountability buddies: scored matches, requests and the
//! accepted buddy list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use habitforge_core::buddy::{match_score, rank_candidates, MatchProfile, CANDIDATE_LIMIT};
use habitforge_core::community::BuddyStatus;
use habitforge_core::error::CoreError;
use habitforge_core::habits::HabitCategory;
use habitforge_core::notifications::{EVENT_BUDDY_ACCEPTED, EVENT_BUDDY_REQUESTED};
use habitforge_core::types::DbId;
use habitforge_db::models::buddy::{BuddyMatch, BuddyView, CandidateRow};
use habitforge_db::models::user::User;
use habitforge_db::repositories::{BuddyRepo, HabitRepo, UserRepo};
use habitforge_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MatchCandidate {
    pub user_id: DbId,
    pub display_name: String,
    pub score: i32,
    pub shared_categories: Vec<HabitCategory>,
}

#[derive(Debug, Deserialize)]
pub struct BuddyRequest {
    pub recipient_id: DbId,
}

/// Unknown category strings are skipped rather than failing the match.
fn parse_categories(raw: &[String]) -> Vec<HabitCategory> {
    raw.iter()
        .filter_map(|c| HabitCategory::from_str_db(c).ok())
        .collect()
}

async fn profile_for(state: &AppState, user: &User) -> AppResult<MatchProfile> {
    let categories = HabitRepo::categories_for_user(&state.pool, user.id).await?;
    Ok(MatchProfile {
        user_id: user.id,
        categories: parse_categories(&categories),
        preferred_time: user.preferences.preferred_time,
        timezone: user.preferences.timezone.clone(),
        accountability_score: user.accountability_score,
    })
}

fn candidate_profile(row: &CandidateRow) -> MatchProfile {
    MatchProfile {
        user_id: row.user_id,
        categories: parse_categories(&row.categories),
        preferred_time: row.preferences.preferred_time,
        timezone: row.preferences.timezone.clone(),
        accountability_score: row.accountability_score,
    }
}

fn request_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Buddy request",
        id,
    })
}

/// GET /api/v1/buddies
pub async fn list_buddies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<BuddyView>>>> {
    let buddies = BuddyRepo::accepted(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(buddies)))
}

/// GET /api/v1/buddies/matches
///
/// Scores up to ten candidates with no existing request in either
/// direction, best match first. Nothing is persisted.
pub async fn find_matches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<MatchCandidate>>>> {
    let user = super::load_user(&state, auth.user_id).await?;
    let seeker = profile_for(&state, &user).await?;

    let rows = BuddyRepo::candidates(&state.pool, auth.user_id, CANDIDATE_LIMIT).await?;
    let profiles: Vec<MatchProfile> = rows.iter().map(candidate_profile).collect();

    let matches = rank_candidates(&seeker, &profiles)
        .into_iter()
        .filter_map(|scored| {
            let row = rows.iter().find(|r| r.user_id == scored.user_id)?;
            Some(MatchCandidate {
                user_id: scored.user_id,
                display_name: row.display_name.clone(),
                score: scored.score,
                shared_categories: scored.shared_categories,
            })
        })
        .collect();

    Ok(Json(DataResponse::new(matches)))
}

/// GET /api/v1/buddies/requests
pub async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<BuddyView>>>> {
    let requests = BuddyRepo::incoming(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(requests)))
}

/// POST /api/v1/buddies/requests
pub async fn send_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BuddyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BuddyMatch>>)> {
    if input.recipient_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot send a buddy request to yourself".into(),
        )));
    }

    let requester = super::load_user(&state, auth.user_id).await?;
    let recipient = UserRepo::find_by_id(&state.pool, input.recipient_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.recipient_id,
        }))?;

    if BuddyRepo::find_between(&state.pool, requester.id, recipient.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A buddy request already exists between these users".into(),
        )));
    }

    let score = match_score(
        &profile_for(&state, &requester).await?,
        &profile_for(&state, &recipient).await?,
    );
    let request = BuddyRepo::create_request(&state.pool, requester.id, recipient.id, score).await?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_BUDDY_REQUESTED)
            .with_source("buddy_match", request.id)
            .with_actor(requester.id)
            .with_recipient(recipient.id)
            .with_payload(serde_json::json!({
                "match_id": request.id,
                "display_name": requester.display_name,
                "score": score,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(request))))
}

/// POST /api/v1/buddies/requests/{id}/accept
pub async fn accept_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BuddyMatch>>> {
    let recipient = super::load_user(&state, auth.user_id).await?;
    let accepted = BuddyRepo::respond(&state.pool, id, auth.user_id, BuddyStatus::Accepted)
        .await?
        .ok_or_else(|| request_not_found(id))?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_BUDDY_ACCEPTED)
            .with_source("buddy_match", accepted.id)
            .with_actor(auth.user_id)
            .with_recipient(accepted.requester_id)
            .with_payload(serde_json::json!({
                "match_id": accepted.id,
                "display_name": recipient.display_name,
            })),
    );

    Ok(Json(DataResponse::new(accepted)))
}

/// POST /api/v1/buddies/requests/{id}/decline
pub async fn decline_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BuddyMatch>>> {
    let declined = BuddyRepo::respond(&state.pool, id, auth.user_id, BuddyStatus::Declined)
        .await?
        .ok_or_else(|| request_not_found(id))?;
    Ok(Json(DataResponse::new(declined)))
}
