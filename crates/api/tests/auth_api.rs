//! HTTP-level tests for signup, login lockout, refresh rotation and logout.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, post_auth, post_json, signup, TEST_PASSWORD,
};
use habitforge_db::repositories::UserRepo;
use sqlx::PgPool;

fn login_body(email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "password": password })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_returns_tokens_and_display_name(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = signup(app, "Jane@Example.com", "Jane").await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["display_name"], "Jane");
    assert_eq!(json["user"]["email"], "jane@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["level"]["level"], 1);
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_is_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(app.clone(), "dup@example.com", "First").await;

    let body = serde_json::json!({
        "email": "DUP@example.com",
        "display_name": "Second",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_weak_input(pool: PgPool) {
    let app = common::build_test_app(pool);

    let cases = [
        ("not-an-email", "Jane", TEST_PASSWORD),
        ("jane@example.com", "J", TEST_PASSWORD),
        ("jane@example.com", "Jane", "short1"),
        ("jane@example.com", "Jane", "lettersonly"),
    ];
    for (email, name, password) in cases {
        let body = serde_json::json!({
            "email": email,
            "display_name": name,
            "password": password,
        });
        let response = post_json(app.clone(), "/api/v1/auth/signup", body).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{email} / {name} / {password}"
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(app.clone(), "login@example.com", "Login").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        login_body("login@example.com", "wrongpass1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        login_body("login@example.com", TEST_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn five_failures_lock_the_account(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    signup(app.clone(), "lock@example.com", "Locked").await;

    for _ in 0..5 {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            login_body("lock@example.com", "wrongpass1"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = post_json(
        app,
        "/api/v1/auth/login",
        login_body("lock@example.com", TEST_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let user = UserRepo::find_by_email(&pool, "lock@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.locked_until.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_token_can_be_used_once(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = signup(app.clone(), "refresh@example.com", "Refresher").await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], json["refresh_token"]);

    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = signup(app.clone(), "logout@example.com", "Leaver").await;
    let access = json["access_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": json["refresh_token"] });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_a_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = signup(app.clone(), "me@example.com", "Itsme").await;
    let response = get_auth(app, "/api/v1/auth/me", json["access_token"].as_str().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["display_name"], "Itsme");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
