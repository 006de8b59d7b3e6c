//! Bands
//!
//! A band's genre set is written together with the band row in one
//! transaction.

use atm_common::db::Band;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{genres, like_escape};
use crate::forms::band::BandInput;
use crate::forms::RelatedChoices;
use crate::pagination::PAGE_SIZE;

pub async fn create(pool: &SqlitePool, input: &BandInput, added_by: Option<i64>) -> sqlx::Result<i64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO bands (name, country_of_origin, location, status, formed_in, ended_in,
                           lyrical_themes, current_label_id, bio, added_by, added, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.country_of_origin)
    .bind(&input.location)
    .bind(input.status)
    .bind(input.formed_in)
    .bind(input.ended_in)
    .bind(&input.lyrical_themes)
    .bind(input.current_label_id)
    .bind(&input.bio)
    .bind(added_by)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let id = result.last_insert_rowid();

    genres::set_band_genres(&mut *tx, id, &input.genre_ids).await?;
    tx.commit().await?;

    Ok(id)
}

/// Overwrite a band and its genre set, re-stamping the editing user
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: &BandInput,
    modified_by: Option<i64>,
) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE bands
        SET name = ?, country_of_origin = ?, location = ?, status = ?, formed_in = ?, ended_in = ?,
            lyrical_themes = ?, current_label_id = ?, bio = ?, added_by = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.country_of_origin)
    .bind(&input.location)
    .bind(input.status)
    .bind(input.formed_in)
    .bind(input.ended_in)
    .bind(&input.lyrical_themes)
    .bind(input.current_label_id)
    .bind(&input.bio)
    .bind(modified_by)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    genres::set_band_genres(&mut *tx, id, &input.genre_ids).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM bands WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Band>> {
    sqlx::query_as::<_, Band>("SELECT * FROM bands WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bands")
        .fetch_one(pool)
        .await
}

pub async fn page_by_name(pool: &SqlitePool, offset: i64) -> sqlx::Result<Vec<Band>> {
    sqlx::query_as::<_, Band>("SELECT * FROM bands ORDER BY name, id LIMIT ? OFFSET ?")
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_by_genre(pool: &SqlitePool, genre_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM band_genres WHERE genre_id = ?")
        .bind(genre_id)
        .fetch_one(pool)
        .await
}

/// One page of the bands tagged with a genre, by name
pub async fn page_by_genre(pool: &SqlitePool, genre_id: i64, offset: i64) -> sqlx::Result<Vec<Band>> {
    sqlx::query_as::<_, Band>(
        r#"
        SELECT b.*
        FROM bands b
        JOIN band_genres bg ON bg.band_id = b.id
        WHERE bg.genre_id = ?
        ORDER BY b.name, b.id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(genre_id)
    .bind(PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on band name
pub async fn search_by_name(pool: &SqlitePool, query: &str) -> sqlx::Result<Vec<Band>> {
    let pattern = format!("%{}%", like_escape(query));
    sqlx::query_as::<_, Band>(
        r#"
        SELECT * FROM bands
        WHERE name LIKE ? ESCAPE '\'
        ORDER BY name, id
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

/// Bands currently signed to a label
pub async fn for_label(pool: &SqlitePool, label_id: i64) -> sqlx::Result<Vec<Band>> {
    sqlx::query_as::<_, Band>("SELECT * FROM bands WHERE current_label_id = ? ORDER BY name, id")
        .bind(label_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<Band>> {
    sqlx::query_as::<_, Band>("SELECT * FROM bands ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn genre_ids(pool: &SqlitePool, band_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT genre_id FROM band_genres WHERE band_id = ? ORDER BY genre_id")
        .bind(band_id)
        .fetch_all(pool)
        .await
}

/// Drop-down entries shown as "name, country"
pub async fn choices(pool: &SqlitePool) -> sqlx::Result<RelatedChoices> {
    sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name || ', ' || country_of_origin FROM bands ORDER BY name, id",
    )
    .fetch_all(pool)
    .await
}

pub async fn all_ids(pool: &SqlitePool) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT id FROM bands")
        .fetch_all(pool)
        .await
}
