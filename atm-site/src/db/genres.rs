//! Genres and the band/album genre links

use atm_common::db::Genre;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

use crate::forms::RelatedChoices;
use crate::pagination::PAGE_SIZE;

pub async fn create(pool: &SqlitePool, name: &str) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO genres (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Rename a genre; false when the id does not exist
pub async fn update(pool: &SqlitePool, id: i64, name: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE genres SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM genres WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Genre>> {
    sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_name(pool: &SqlitePool, name: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM genres WHERE name = ?)")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await
}

/// One page of genres by name
pub async fn page_by_name(pool: &SqlitePool, offset: i64) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name, id LIMIT ? OFFSET ?")
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn choices(pool: &SqlitePool) -> sqlx::Result<RelatedChoices> {
    sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM genres ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn for_band(pool: &SqlitePool, band_id: i64) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.id, g.name
        FROM genres g
        JOIN band_genres bg ON bg.genre_id = g.id
        WHERE bg.band_id = ?
        ORDER BY g.name
        "#,
    )
    .bind(band_id)
    .fetch_all(pool)
    .await
}

pub async fn for_album(pool: &SqlitePool, album_id: i64) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.id, g.name
        FROM genres g
        JOIN album_genres ag ON ag.genre_id = g.id
        WHERE ag.album_id = ?
        ORDER BY g.name
        "#,
    )
    .bind(album_id)
    .fetch_all(pool)
    .await
}

/// Genre names of every band, keyed by band id
pub async fn names_by_band(pool: &SqlitePool) -> sqlx::Result<HashMap<i64, Vec<String>>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT bg.band_id, g.name
        FROM band_genres bg
        JOIN genres g ON g.id = bg.genre_id
        ORDER BY g.name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(group(rows))
}

/// Genre names of every album, keyed by album id
pub async fn names_by_album(pool: &SqlitePool) -> sqlx::Result<HashMap<i64, Vec<String>>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT ag.album_id, g.name
        FROM album_genres ag
        JOIN genres g ON g.id = ag.genre_id
        ORDER BY g.name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(group(rows))
}

fn group(rows: Vec<(i64, String)>) -> HashMap<i64, Vec<String>> {
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for (owner, name) in rows {
        grouped.entry(owner).or_default().push(name);
    }
    grouped
}

/// Replace the genre set of a band inside an open transaction
pub async fn set_band_genres(
    conn: &mut SqliteConnection,
    band_id: i64,
    genre_ids: &[i64],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM band_genres WHERE band_id = ?")
        .bind(band_id)
        .execute(&mut *conn)
        .await?;
    for genre_id in genre_ids {
        sqlx::query("INSERT INTO band_genres (band_id, genre_id) VALUES (?, ?)")
            .bind(band_id)
            .bind(genre_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Replace the genre set of an album inside an open transaction
pub async fn set_album_genres(
    conn: &mut SqliteConnection,
    album_id: i64,
    genre_ids: &[i64],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM album_genres WHERE album_id = ?")
        .bind(album_id)
        .execute(&mut *conn)
        .await?;
    for genre_id in genre_ids {
        sqlx::query("INSERT INTO album_genres (album_id, genre_id) VALUES (?, ?)")
            .bind(album_id)
            .bind(genre_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
