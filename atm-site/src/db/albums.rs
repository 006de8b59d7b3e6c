//! Albums

use atm_common::db::{Album, AlbumType, MediaFormat};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use super::genres;
use crate::forms::album::AlbumInput;
use crate::pagination::PAGE_SIZE;

/// Album joined with its band and label names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlbumSummary {
    pub id: i64,
    pub title: String,
    pub band_id: i64,
    pub band_name: String,
    pub label_id: i64,
    pub label_name: String,
    pub album_type: AlbumType,
    pub release_date: Option<NaiveDate>,
    pub catalog_id: String,
    pub format: MediaFormat,
    pub added: DateTime<Utc>,
}

const SUMMARY_SELECT: &str = r#"
    SELECT a.id, a.title, a.band_id, b.name AS band_name, a.label_id, l.name AS label_name,
           a.album_type, a.release_date, a.catalog_id, a.format, a.added
    FROM albums a
    JOIN bands b ON b.id = a.band_id
    JOIN labels l ON l.id = a.label_id
"#;

pub async fn create(pool: &SqlitePool, input: &AlbumInput, added_by: Option<i64>) -> sqlx::Result<i64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO albums (title, band_id, album_type, release_date, catalog_id, label_id, format,
                            added_by, added, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(input.band_id)
    .bind(input.album_type)
    .bind(input.release_date)
    .bind(&input.catalog_id)
    .bind(input.label_id)
    .bind(input.format)
    .bind(added_by)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let id = result.last_insert_rowid();

    genres::set_album_genres(&mut *tx, id, &input.genre_ids).await?;
    tx.commit().await?;

    Ok(id)
}

/// Overwrite an album and its genre set, re-stamping the editing user
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &AlbumInput,
    modified_by: Option<i64>,
) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE albums
        SET title = ?, band_id = ?, album_type = ?, release_date = ?, catalog_id = ?, label_id = ?,
            format = ?, added_by = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(input.band_id)
    .bind(input.album_type)
    .bind(input.release_date)
    .bind(&input.catalog_id)
    .bind(input.label_id)
    .bind(input.format)
    .bind(modified_by)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    genres::set_album_genres(&mut *tx, id, &input.genre_ids).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Album>> {
    sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<AlbumSummary>> {
    sqlx::query_as::<_, AlbumSummary>(&format!("{} WHERE a.id = ?", SUMMARY_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_title(pool: &SqlitePool, title: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM albums WHERE title = ?)")
        .bind(title)
        .fetch_one(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await
}

/// One page of albums, most recently added first
pub async fn page_latest(pool: &SqlitePool, offset: i64) -> sqlx::Result<Vec<AlbumSummary>> {
    sqlx::query_as::<_, AlbumSummary>(&format!(
        "{} ORDER BY a.added DESC, a.id DESC LIMIT ? OFFSET ?",
        SUMMARY_SELECT
    ))
    .bind(PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// A band's discography by release date
pub async fn for_band(pool: &SqlitePool, band_id: i64) -> sqlx::Result<Vec<AlbumSummary>> {
    sqlx::query_as::<_, AlbumSummary>(&format!(
        "{} WHERE a.band_id = ? ORDER BY a.release_date, a.id",
        SUMMARY_SELECT
    ))
    .bind(band_id)
    .fetch_all(pool)
    .await
}

/// Albums released on a label
pub async fn for_label(pool: &SqlitePool, label_id: i64) -> sqlx::Result<Vec<AlbumSummary>> {
    sqlx::query_as::<_, AlbumSummary>(&format!(
        "{} WHERE a.label_id = ? ORDER BY a.release_date, a.id",
        SUMMARY_SELECT
    ))
    .bind(label_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<AlbumSummary>> {
    sqlx::query_as::<_, AlbumSummary>(&format!("{} ORDER BY a.added DESC, a.id DESC", SUMMARY_SELECT))
        .fetch_all(pool)
        .await
}

pub async fn genre_ids(pool: &SqlitePool, album_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT genre_id FROM album_genres WHERE album_id = ? ORDER BY genre_id")
        .bind(album_id)
        .fetch_all(pool)
        .await
}

pub async fn all_ids(pool: &SqlitePool) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT id FROM albums")
        .fetch_all(pool)
        .await
}
