//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates every catalog table.
//! Table creation is idempotent, so this runs on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // foreign_keys is a per-connection pragma, so it goes on the connect options
    // rather than a one-off query against the pool
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema
///
/// Limited to a single connection: every SQLite in-memory connection is its
/// own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // Accounts
    create_users_table(pool).await?;
    create_sessions_table(pool).await?;

    // Catalog entities, parents before children
    create_genres_table(pool).await?;
    create_labels_table(pool).await?;
    create_musicians_table(pool).await?;
    create_bands_table(pool).await?;
    create_albums_table(pool).await?;
    create_reviews_table(pool).await?;

    // Linking tables
    create_band_genres_table(pool).await?;
    create_album_genres_table(pool).await?;
    create_memberships_table(pool).await?;

    Ok(())
}

pub async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            joined TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created TEXT NOT NULL,
            expires TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_labels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS labels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            country TEXT NOT NULL,
            status INTEGER NOT NULL,
            styles TEXT NOT NULL,
            founding_year INTEGER NOT NULL,
            added_by INTEGER REFERENCES users(id) ON DELETE CASCADE,
            added TEXT NOT NULL,
            modified TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_musicians_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS musicians (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            full_name TEXT NOT NULL,
            born TEXT,
            died TEXT,
            place_of_birth TEXT NOT NULL,
            bio TEXT,
            added_by INTEGER REFERENCES users(id) ON DELETE CASCADE,
            added TEXT NOT NULL,
            modified TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_bands_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            country_of_origin TEXT NOT NULL,
            location TEXT NOT NULL,
            status INTEGER NOT NULL,
            formed_in INTEGER NOT NULL,
            ended_in INTEGER,
            lyrical_themes TEXT NOT NULL,
            current_label_id INTEGER NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
            bio TEXT,
            added_by INTEGER REFERENCES users(id) ON DELETE CASCADE,
            added TEXT NOT NULL,
            modified TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_albums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            band_id INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
            album_type INTEGER NOT NULL,
            release_date TEXT,
            catalog_id TEXT NOT NULL,
            label_id INTEGER NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
            format INTEGER NOT NULL,
            added_by INTEGER REFERENCES users(id) ON DELETE CASCADE,
            added TEXT NOT NULL,
            modified TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Reviews
///
/// `rating` holds tenths of a point (8.5 is stored as 85).
pub async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            rating INTEGER NOT NULL,
            description TEXT NOT NULL,
            album_id INTEGER NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
            band_id INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            added TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_band_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS band_genres (
            band_id INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
            PRIMARY KEY (band_id, genre_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_album_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_genres (
            album_id INTEGER NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
            PRIMARY KEY (album_id, genre_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Band membership: one tenure of a musician in a band
///
/// A musician who left and rejoined has two rows for the same band.
pub async fn create_memberships_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memberships (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            musician_id INTEGER NOT NULL REFERENCES musicians(id) ON DELETE CASCADE,
            band_id INTEGER NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
            year_from INTEGER,
            year_to INTEGER,
            role TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
