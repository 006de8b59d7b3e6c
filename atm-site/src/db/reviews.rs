//! Album reviews

use atm_common::db::{Rating, Review};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use sqlx::SqlitePool;

use crate::forms::review::ReviewInput;
use crate::pagination::PAGE_SIZE;

/// Review joined with album title, band name and author
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewSummary {
    pub id: i64,
    pub subject: String,
    pub rating: Rating,
    pub description: String,
    pub album_id: i64,
    pub album_title: String,
    pub band_id: i64,
    pub band_name: String,
    pub user_id: i64,
    pub username: String,
    pub added: DateTime<Utc>,
}

const SUMMARY_SELECT: &str = r#"
    SELECT r.id, r.subject, r.rating, r.description, r.album_id, a.title AS album_title,
           r.band_id, b.name AS band_name, r.user_id, u.username, r.added
    FROM reviews r
    JOIN albums a ON a.id = r.album_id
    JOIN bands b ON b.id = r.band_id
    JOIN users u ON u.id = r.user_id
"#;

pub async fn create(
    pool: &SqlitePool,
    input: &ReviewInput,
    album_id: i64,
    band_id: i64,
    user_id: i64,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO reviews (subject, rating, description, album_id, band_id, user_id, added)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.subject)
    .bind(input.rating)
    .bind(&input.description)
    .bind(album_id)
    .bind(band_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Overwrite subject, rating and text; the editor becomes the author
pub async fn update(pool: &SqlitePool, id: i64, input: &ReviewInput, user_id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE reviews SET subject = ?, rating = ?, description = ?, user_id = ? WHERE id = ?",
    )
    .bind(&input.subject)
    .bind(input.rating)
    .bind(&input.description)
    .bind(user_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Review>> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<ReviewSummary>> {
    sqlx::query_as::<_, ReviewSummary>(&format!("{} WHERE r.id = ?", SUMMARY_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await
}

/// One page of reviews, newest first
pub async fn page_latest(pool: &SqlitePool, offset: i64) -> sqlx::Result<Vec<ReviewSummary>> {
    sqlx::query_as::<_, ReviewSummary>(&format!(
        "{} ORDER BY r.added DESC, r.id DESC LIMIT ? OFFSET ?",
        SUMMARY_SELECT
    ))
    .bind(PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn for_band(pool: &SqlitePool, band_id: i64) -> sqlx::Result<Vec<ReviewSummary>> {
    sqlx::query_as::<_, ReviewSummary>(&format!(
        "{} WHERE r.band_id = ? ORDER BY r.added DESC, r.id DESC",
        SUMMARY_SELECT
    ))
    .bind(band_id)
    .fetch_all(pool)
    .await
}

pub async fn for_album(pool: &SqlitePool, album_id: i64) -> sqlx::Result<Vec<ReviewSummary>> {
    sqlx::query_as::<_, ReviewSummary>(&format!(
        "{} WHERE r.album_id = ? ORDER BY r.added DESC, r.id DESC",
        SUMMARY_SELECT
    ))
    .bind(album_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<ReviewSummary>> {
    sqlx::query_as::<_, ReviewSummary>(&format!("{} ORDER BY r.added DESC, r.id DESC", SUMMARY_SELECT))
        .fetch_all(pool)
        .await
}

/// Up to `limit` reviews picked at random, in random order
pub async fn random_sample(pool: &SqlitePool, limit: usize) -> sqlx::Result<Vec<ReviewSummary>> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM reviews")
        .fetch_all(pool)
        .await?;

    let picked: Vec<i64> = ids
        .choose_multiple(&mut rand::thread_rng(), limit)
        .copied()
        .collect();

    let mut sample = Vec::with_capacity(picked.len());
    for id in picked {
        if let Some(review) = find_summary(pool, id).await? {
            sample.push(review);
        }
    }
    Ok(sample)
}
