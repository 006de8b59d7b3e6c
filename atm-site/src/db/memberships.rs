//! Band memberships (musician tenures)

use atm_common::db::Membership;
use sqlx::SqlitePool;

use crate::forms::membership::MembershipInput;

/// Membership joined with musician and band names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MembershipSummary {
    pub id: i64,
    pub musician_id: i64,
    pub musician_name: String,
    pub musician_full_name: String,
    pub band_id: i64,
    pub band_name: String,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub role: String,
}

const SUMMARY_SELECT: &str = r#"
    SELECT m.id, m.musician_id, mu.name AS musician_name, mu.full_name AS musician_full_name,
           m.band_id, b.name AS band_name, m.year_from, m.year_to, m.role
    FROM memberships m
    JOIN musicians mu ON mu.id = m.musician_id
    JOIN bands b ON b.id = m.band_id
"#;

pub async fn create(pool: &SqlitePool, input: &MembershipInput) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO memberships (musician_id, band_id, year_from, year_to, role)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.musician_id)
    .bind(input.band_id)
    .bind(input.year_from)
    .bind(input.year_to)
    .bind(&input.role)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, id: i64, input: &MembershipInput) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE memberships
        SET musician_id = ?, band_id = ?, year_from = ?, year_to = ?, role = ?
        WHERE id = ?
        "#,
    )
    .bind(input.musician_id)
    .bind(input.band_id)
    .bind(input.year_from)
    .bind(input.year_to)
    .bind(&input.role)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM memberships WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Membership>> {
    sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<MembershipSummary>> {
    sqlx::query_as::<_, MembershipSummary>(&format!("{} WHERE m.id = ?", SUMMARY_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Line-up of a band, earliest tenure first
pub async fn for_band(pool: &SqlitePool, band_id: i64) -> sqlx::Result<Vec<MembershipSummary>> {
    sqlx::query_as::<_, MembershipSummary>(&format!(
        "{} WHERE m.band_id = ? ORDER BY m.year_from, m.id",
        SUMMARY_SELECT
    ))
    .bind(band_id)
    .fetch_all(pool)
    .await
}

/// Bands a musician played in
pub async fn for_musician(pool: &SqlitePool, musician_id: i64) -> sqlx::Result<Vec<MembershipSummary>> {
    sqlx::query_as::<_, MembershipSummary>(&format!(
        "{} WHERE m.musician_id = ? ORDER BY m.year_from, m.id",
        SUMMARY_SELECT
    ))
    .bind(musician_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<MembershipSummary>> {
    sqlx::query_as::<_, MembershipSummary>(&format!("{} ORDER BY m.id", SUMMARY_SELECT))
        .fetch_all(pool)
        .await
}
