//! HTTP-level tests for challenges, accountability buddies and the admin
//! endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_habit, delete_auth, get_auth, post_auth, post_json, post_json_auth,
    signup_token, TEST_PASSWORD,
};
use sqlx::PgPool;

fn challenge_body(title: &str, max_participants: i32) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "category": "fitness",
        "duration_days": 30,
        "max_participants": max_participants,
    })
}

async fn create_challenge(app: axum::Router, token: &str, max: i32) -> i64 {
    let response = post_json_auth(app, "/api/v1/challenges", challenge_body("Plank month", max), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["participant_count"], 1);
    assert_eq!(json["data"]["status"], "active");
    json["data"]["id"].as_i64().unwrap()
}

/// Promote a user to admin and return a fresh access token carrying the role.
async fn promote_to_admin(pool: &PgPool, app: axum::Router, email: &str) -> String {
    sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let json = body_json(post_json(app, "/api/v1/auth/login", body).await).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn join_respects_capacity_and_membership(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (creator, _) = signup_token(app.clone(), "creator@example.com").await;
    let (second, _) = signup_token(app.clone(), "second@example.com").await;
    let (third, _) = signup_token(app.clone(), "third@example.com").await;
    let id = create_challenge(app.clone(), &creator, 2).await;
    let join = format!("/api/v1/challenges/{id}/join");

    let response = post_auth(app.clone(), &join, &creator).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(app.clone(), &join, &second).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["participant_count"], 2);

    let response = post_auth(app.clone(), &join, &third).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Challenge is full");

    let leave = format!("/api/v1/challenges/{id}/leave");
    let response = post_auth(app.clone(), &leave, &second).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = post_auth(app.clone(), &leave, &second).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_auth(app, &join, &third).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_creator_or_admin_deletes_challenge(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (creator, _) = signup_token(app.clone(), "maker@example.com").await;
    let (other, _) = signup_token(app.clone(), "other@example.com").await;
    let id = create_challenge(app.clone(), &creator, 10).await;
    let uri = format!("/api/v1/challenges/{id}");

    let response = delete_auth(app.clone(), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = promote_to_admin(&pool, app.clone(), "other@example.com").await;
    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &creator).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn challenge_validation_and_status_filter(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup_token(app.clone(), "filter@example.com").await;

    let too_long = serde_json::json!({
        "title": "Forever",
        "category": "fitness",
        "duration_days": 400,
    });
    let response = post_json_auth(app.clone(), "/api/v1/challenges", too_long, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let past = serde_json::json!({
        "title": "Yesterday",
        "category": "fitness",
        "duration_days": 7,
        "start_date": "2000-01-01",
    });
    let response = post_json_auth(app.clone(), "/api/v1/challenges", past, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    create_challenge(app.clone(), &token, 10).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/challenges?status=active", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    let json = body_json(get_auth(app, "/api/v1/challenges?status=upcoming", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Buddies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn buddy_request_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, alice_id) = signup_token(app.clone(), "alice@example.com").await;
    let (bob, bob_id) = signup_token(app.clone(), "bob@example.com").await;
    create_habit(app.clone(), &alice, "Run").await;
    create_habit(app.clone(), &bob, "Cycle").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/buddies/matches", &alice).await).await;
    let matches = json["data"].as_array().unwrap();
    let bob_match = matches.iter().find(|m| m["user_id"] == bob_id).unwrap();
    let score = bob_match["score"].as_i64().unwrap();
    assert!((0..=100).contains(&score));
    assert_eq!(bob_match["shared_categories"][0], "fitness");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/buddies/requests",
        serde_json::json!({ "recipient_id": alice_id }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/buddies/requests",
        serde_json::json!({ "recipient_id": bob_id }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let request_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // A request in the opposite direction collides with the pending one.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/buddies/requests",
        serde_json::json!({ "recipient_id": alice_id }),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(get_auth(app.clone(), "/api/v1/buddies/requests", &bob).await).await;
    assert_eq!(json["data"][0]["user_id"], alice_id);

    // Only the recipient can answer.
    let accept = format!("/api/v1/buddies/requests/{request_id}/accept");
    let response = post_auth(app.clone(), &accept, &alice).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_auth(app.clone(), &accept, &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "accepted");

    let json = body_json(get_auth(app.clone(), "/api/v1/buddies", &alice).await).await;
    assert_eq!(json["data"][0]["user_id"], bob_id);

    let json = body_json(get_auth(app, "/api/v1/buddies/matches", &alice).await).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["user_id"] != bob_id));
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_endpoints_require_admin_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup_token(app.clone(), "plain@example.com").await;

    let response = get_auth(app.clone(), "/api/v1/admin/stats", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_manages_users_and_habits(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    signup_token(app.clone(), "boss@example.com").await;
    let (member, member_id) = signup_token(app.clone(), "member@example.com").await;
    let habit_a = create_habit(app.clone(), &member, "A").await;
    let habit_b = create_habit(app.clone(), &member, "B").await;
    let admin = promote_to_admin(&pool, app.clone(), "boss@example.com").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/stats", &admin).await).await;
    assert_eq!(json["data"]["total_users"], 2);
    assert_eq!(json["data"]["total_habits"], 2);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/habits/batch-status",
        serde_json::json!({ "ids": [habit_a, habit_b], "status": "paused" }),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["affected"], 2);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/habits/batch-delete",
        serde_json::json!({ "ids": [] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/habits/batch-delete",
        serde_json::json!({ "ids": [habit_a] }),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["affected"], 1);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/users?limit=10", &admin).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/users/{member_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A deactivated user's token no longer works.
    let response = get_auth(app.clone(), "/api/v1/users/me", &member).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete_auth(app, &format!("/api/v1/admin/users/{member_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
