//! User accounts

use atm_common::db::User;
use atm_common::password::{generate_salt, hash_password, verify_password};
use chrono::Utc;
use sqlx::SqlitePool;

/// Account to create
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub is_admin: bool,
}

/// Create a user, hashing the password with a fresh salt
pub async fn create_user(pool: &SqlitePool, user: &NewUser<'_>) -> atm_common::Result<i64> {
    let salt = generate_salt();
    let hash = hash_password(user.password, &salt)?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, first_name, last_name, password_hash, password_salt, is_admin, joined)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(hash)
    .bind(salt)
    .bind(user.is_admin)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
        .bind(username)
        .fetch_one(pool)
        .await
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await
}

/// Look up a user by credentials; `None` for an unknown name or wrong password
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> sqlx::Result<Option<User>> {
    let user = find_by_username(pool, username).await?;
    Ok(user.filter(|u| verify_password(password, &u.password_hash)))
}

/// Replace a user's password (new salt, new hash)
pub async fn set_password(pool: &SqlitePool, id: i64, password: &str) -> atm_common::Result<()> {
    let salt = generate_salt();
    let hash = hash_password(password, &salt)?;

    sqlx::query("UPDATE users SET password_hash = ?, password_salt = ? WHERE id = ?")
        .bind(hash)
        .bind(salt)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await
}
