//! Integration tests for refresh-session storage and rotation.

use chrono::{Duration, Utc};
use inventra_db::models::session::CreateSession;
use inventra_db::models::user::CreateUser;
use inventra_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;

async fn new_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            fullname: "Session User".to_string(),
            email: "Session@Example.com".to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn session(user_id: i64, hash: &str) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + Duration::days(7),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_is_stored_lowercase_and_matched_case_insensitively(pool: PgPool) {
    let id = new_user(&pool).await;
    let user = UserRepo::find_by_email(&pool, "SESSION@example.COM")
        .await
        .unwrap()
        .expect("lookup should ignore case");
    assert_eq!(user.id, id);
    assert_eq!(user.email, "session@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rotate_revokes_old_session_once(pool: PgPool) {
    let user_id = new_user(&pool).await;
    let old = SessionRepo::create(&pool, &session(user_id, "hash-a")).await.unwrap();

    let new = SessionRepo::rotate(&pool, old.id, &session(user_id, "hash-b"))
        .await
        .unwrap()
        .expect("first rotation should succeed");
    assert_eq!(new.user_id, user_id);

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-a").await.unwrap().is_none());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-b").await.unwrap().is_some());

    let replay = SessionRepo::rotate(&pool, old.id, &session(user_id, "hash-c"))
        .await
        .unwrap();
    assert!(replay.is_none(), "a revoked session must not rotate again");
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-c").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cleanup_removes_revoked_sessions(pool: PgPool) {
    let user_id = new_user(&pool).await;
    SessionRepo::create(&pool, &session(user_id, "keep")).await.unwrap();
    SessionRepo::create(&pool, &session(user_id, "drop")).await.unwrap();
    let dropped = SessionRepo::find_by_refresh_token_hash(&pool, "drop").await.unwrap().unwrap();
    SessionRepo::revoke(&pool, dropped.id).await.unwrap();

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "keep").await.unwrap().is_some());
}
