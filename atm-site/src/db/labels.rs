//! Record labels

use atm_common::db::Label;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::forms::label::LabelInput;
use crate::forms::RelatedChoices;
use crate::pagination::PAGE_SIZE;

pub async fn create(pool: &SqlitePool, input: &LabelInput, added_by: Option<i64>) -> sqlx::Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO labels (name, address, country, status, styles, founding_year, added_by, added, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.country)
    .bind(input.status)
    .bind(&input.styles)
    .bind(input.founding_year)
    .bind(added_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Overwrite all editable fields; false when the id does not exist
pub async fn update(pool: &SqlitePool, id: i64, input: &LabelInput) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE labels
        SET name = ?, address = ?, country = ?, status = ?, styles = ?, founding_year = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.country)
    .bind(input.status)
    .bind(&input.styles)
    .bind(input.founding_year)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM labels WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Label>> {
    sqlx::query_as::<_, Label>("SELECT * FROM labels WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_name(pool: &SqlitePool, name: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM labels WHERE name = ?)")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM labels")
        .fetch_one(pool)
        .await
}

pub async fn page_by_name(pool: &SqlitePool, offset: i64) -> sqlx::Result<Vec<Label>> {
    sqlx::query_as::<_, Label>("SELECT * FROM labels ORDER BY name, id LIMIT ? OFFSET ?")
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<Label>> {
    sqlx::query_as::<_, Label>("SELECT * FROM labels ORDER BY name, id")
        .fetch_all(pool)
        .await
}

pub async fn choices(pool: &SqlitePool) -> sqlx::Result<RelatedChoices> {
    sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM labels ORDER BY name, id")
        .fetch_all(pool)
        .await
}
