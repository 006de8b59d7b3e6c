//! Musicians

use atm_common::db::Musician;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::forms::musician::MusicianInput;
use crate::forms::RelatedChoices;

pub async fn create(
    pool: &SqlitePool,
    input: &MusicianInput,
    added_by: Option<i64>,
) -> sqlx::Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO musicians (name, full_name, born, died, place_of_birth, bio, added_by, added, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.full_name)
    .bind(input.born)
    .bind(input.died)
    .bind(&input.place_of_birth)
    .bind(&input.bio)
    .bind(added_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, id: i64, input: &MusicianInput) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE musicians
        SET name = ?, full_name = ?, born = ?, died = ?, place_of_birth = ?, bio = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.full_name)
    .bind(input.born)
    .bind(input.died)
    .bind(&input.place_of_birth)
    .bind(&input.bio)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM musicians WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Musician>> {
    sqlx::query_as::<_, Musician>("SELECT * FROM musicians WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Duplicate check: the same stage name and full name on one row
pub async fn exists_by_names(pool: &SqlitePool, name: &str, full_name: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM musicians WHERE name = ? AND full_name = ?)",
    )
    .bind(name)
    .bind(full_name)
    .fetch_one(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<Musician>> {
    sqlx::query_as::<_, Musician>("SELECT * FROM musicians ORDER BY name, id")
        .fetch_all(pool)
        .await
}

/// Drop-down entries shown as "name, full name"
pub async fn choices(pool: &SqlitePool) -> sqlx::Result<RelatedChoices> {
    sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name || ', ' || full_name FROM musicians ORDER BY name, id",
    )
    .fetch_all(pool)
    .await
}
