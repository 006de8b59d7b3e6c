//! Tests for database initialization and cascade rules

use atm_common::db::init::{init_database, init_memory_database};
use chrono::Utc;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("atm.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("atm.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO genres (name) VALUES ('doom')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    // Second open keeps existing rows
    let pool2 = init_database(&db_path).await.unwrap();
    assert_eq!(count(&pool2, "genres").await, 1);
}

#[tokio::test]
async fn test_all_tables_exist() {
    let pool = init_memory_database().await.unwrap();

    for table in [
        "users",
        "sessions",
        "genres",
        "labels",
        "musicians",
        "bands",
        "band_genres",
        "albums",
        "album_genres",
        "reviews",
        "memberships",
    ] {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(exists, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let pool = init_memory_database().await.unwrap();
    let now = Utc::now();

    // Band pointing at a label that does not exist
    let result = sqlx::query(
        "INSERT INTO bands (name, country_of_origin, location, status, formed_in, \
         lyrical_themes, current_label_id, added, modified) \
         VALUES ('Ghost', 'Sweden', 'Linköping', 1, 2006, 'occult', 42, ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "FK violation should be rejected");
}

#[tokio::test]
async fn test_band_delete_cascades() {
    let pool = init_memory_database().await.unwrap();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO users (username, email, password_hash, password_salt, joined) \
         VALUES ('marko', 'marko@o2.pl', 'h', 's', ?)",
    )
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO genres (name) VALUES ('black metal')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO labels (name, address, country, status, styles, founding_year, added, modified) \
         VALUES ('Peaceville', 'Dewsbury', 'UK', 1, 'doom', 1987, ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO bands (name, country_of_origin, location, status, formed_in, \
         lyrical_themes, current_label_id, added, modified) \
         VALUES ('Darkthrone', 'Norway', 'Kolbotn', 1, 1986, 'darkness', 1, ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO band_genres (band_id, genre_id) VALUES (1, 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO albums (title, band_id, album_type, catalog_id, label_id, format, added, modified) \
         VALUES ('Transilvanian Hunger', 1, 1, 'VILE 43', 1, 1, ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO reviews (subject, rating, description, album_id, band_id, user_id, added) \
         VALUES ('Cold', 95, 'Raw.', 1, 1, 1, ?)",
    )
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO musicians (name, full_name, place_of_birth, added, modified) \
         VALUES ('Fenriz', 'Gylve Fenris Nagell', 'Kolbotn', ?, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO memberships (musician_id, band_id, year_from, role) VALUES (1, 1, 1986, 'drums')",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("DELETE FROM bands WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(count(&pool, "albums").await, 0);
    assert_eq!(count(&pool, "reviews").await, 0);
    assert_eq!(count(&pool, "memberships").await, 0);
    assert_eq!(count(&pool, "band_genres").await, 0);
    // Independent rows survive
    assert_eq!(count(&pool, "musicians").await, 1);
    assert_eq!(count(&pool, "labels").await, 1);
    assert_eq!(count(&pool, "genres").await, 1);
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let pool = init_memory_database().await.unwrap();
    atm_common::db::create_schema(&pool).await.unwrap();
    assert_eq!(count(&pool, "bands").await, 0);
}
