//! Login sessions
//!
//! A session is a random token stored in the `sessions` table and handed to
//! the browser in the `atm_session` cookie.

use atm_common::db::User;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Create a session for `user_id` and return its token
pub async fn create_session(pool: &SqlitePool, user_id: i64, ttl: Duration) -> sqlx::Result<String> {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let now = Utc::now();

    sqlx::query("INSERT INTO sessions (token, user_id, created, expires) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(now)
        .bind(now + ttl)
        .execute(pool)
        .await?;

    Ok(token)
}

/// User owning an unexpired session
pub async fn find_user_by_token(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.*
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = ? AND s.expires > ?
        "#,
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove expired sessions, returning how many were removed
pub async fn delete_expired(pool: &SqlitePool) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// End every session of a user (after a password change)
pub async fn delete_for_user(pool: &SqlitePool, user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
