//! HTTP-level tests for registration, login, refresh rotation, logout and
//! profile changes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, put_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: &axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_returns_tokens_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "fullname": "  Ada Lovelace ", "email": "Ada@Example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["fullname"], "Ada Lovelace");
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(&app, "dup@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "fullname": "Someone", "email": "DUP@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_validates_input(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "fullname": "Shorty", "email": "short@example.com", "password": "123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("password"));

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "fullname": "Bad Mail", "email": "not-an-email", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_and_failures(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, user_id) = common::register(&app, "login@example.com").await;

    let response = login(&app, "LOGIN@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user_id);

    let response = login(&app, "login@example.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "ghost@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_to_deactivated_account_is_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, user_id) = common::register(&app, "inactive@example.com").await;

    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = login(&app, "inactive@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_token_is_single_use(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(&app, "refresh@example.com").await;

    let json = body_json(login(&app, "refresh@example.com", TEST_PASSWORD).await).await;
    let first = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], first.as_str());

    let replay = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": rotated["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(&app, "logout@example.com").await;

    let json = body_json(login(&app, "logout@example.com", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_current_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::register(&app, "me@example.com").await;

    let response = get_auth(app.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user_id);
    assert_eq!(json["data"]["email"], "me@example.com");

    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_me_patches_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::register(&app, "profile@example.com").await;

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me",
        &token,
        json!({ "fullname": "  Grace Hopper ", "avatar_url": "https://cdn.example.com/grace.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], user_id);
    assert_eq!(json["fullname"], "Grace Hopper");
    assert_eq!(json["avatar_url"], "https://cdn.example.com/grace.png");

    // Omitted fields keep their value.
    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me",
        &token,
        json!({ "fullname": "Rear Admiral Hopper" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app.clone(), "/api/v1/auth/me", &token).await).await;
    assert_eq!(json["data"]["fullname"], "Rear Admiral Hopper");
    assert_eq!(json["data"]["avatar_url"], "https://cdn.example.com/grace.png");
    assert_eq!(json["data"]["email"], "profile@example.com");

    for body in [
        json!({ "fullname": "   " }),
        json!({ "fullname": "x" }),
        json!({ "avatar_url": "not a url" }),
    ] {
        let response = put_json_auth(app.clone(), "/api/v1/auth/me", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = put_json_auth(app, "/api/v1/auth/me", "not-a-jwt", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password_rechecks_current_and_revokes_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register(&app, "rotate-pw@example.com").await;
    let json = body_json(login(&app, "rotate-pw@example.com", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me/password",
        access,
        json!({
            "current_password": "wrong-password",
            "new_password": "n3w-password",
            "confirm_password": "n3w-password"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Current password is incorrect");

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me/password",
        access,
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "n3w-password",
            "confirm_password": "n3w-passw0rd"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "New password and confirm password don't match"
    );

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me/password",
        access,
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "short",
            "confirm_password": "short"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Rejected attempts leave the old session usable.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refresh = body_json(response).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me/password",
        access,
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "n3w-password",
            "confirm_password": "n3w-password"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "rotate-pw@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = login(&app, "rotate-pw@example.com", "n3w-password").await;
    assert_eq!(response.status(), StatusCode::OK);
}
