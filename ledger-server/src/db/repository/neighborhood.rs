//! Neighborhood Repository

use super::{RepoError, RepoResult};
use shared::models::{Neighborhood, NeighborhoodCreate, NeighborhoodUpdate};
use sqlx::SqlitePool;

const NEIGHBORHOOD_SELECT: &str = "SELECT id, name, delivery_fee, delivery_time_minutes, is_active, created_at, updated_at FROM neighborhood";

fn validate_fields(fee: Option<f64>, minutes: Option<i32>) -> RepoResult<()> {
    if let Some(fee) = fee {
        if !fee.is_finite() || fee < 0.0 {
            return Err(RepoError::Validation(format!(
                "delivery_fee must be non-negative: {fee}"
            )));
        }
    }
    if let Some(minutes) = minutes
        && minutes < 1
    {
        return Err(RepoError::Validation(format!(
            "delivery_time_minutes must be positive: {minutes}"
        )));
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Neighborhood>> {
    let sql = format!("{NEIGHBORHOOD_SELECT} WHERE is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, Neighborhood>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Neighborhood>> {
    let sql = format!("{NEIGHBORHOOD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Neighborhood>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by name (case-insensitive), active entries only.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Neighborhood>> {
    let sql = format!("{NEIGHBORHOOD_SELECT} WHERE is_active = 1 AND name = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, Neighborhood>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: NeighborhoodCreate) -> RepoResult<Neighborhood> {
    validate_fields(Some(data.delivery_fee), Some(data.delivery_time_minutes))?;

    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Neighborhood '{}' already exists",
            data.name
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO neighborhood (id, name, delivery_fee, delivery_time_minutes, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.delivery_fee)
    .bind(data.delivery_time_minutes)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create neighborhood".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: NeighborhoodUpdate,
) -> RepoResult<Neighborhood> {
    validate_fields(data.delivery_fee, data.delivery_time_minutes)?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE neighborhood SET name = COALESCE(?1, name), delivery_fee = COALESCE(?2, delivery_fee), delivery_time_minutes = COALESCE(?3, delivery_time_minutes), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.delivery_fee)
    .bind(data.delivery_time_minutes)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Neighborhood {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Neighborhood {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE neighborhood SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
