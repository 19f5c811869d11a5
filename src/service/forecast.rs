//! CRUD execution against the `weather_forecast` table.
//!
//! Every mutating operation runs in its own transaction: the row is read
//! back from storage (`RETURNING`) before the commit, and a drop without
//! commit rolls the transaction back.

use crate::error::AppError;
use crate::model::{ForecastInput, ForecastPatch, ForecastRecord};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const TABLE: &str = "weather_forecast";

const COLUMNS: &str = "collection_time, temperature, temperature_min, temperature_max, \
     humidity, description, feels_like, wind_speed, wind_direction, create_date, update_date";

pub struct ForecastService;

impl ForecastService {
    /// All records sharing the maximum `collection_time`; empty table yields
    /// an empty list.
    pub async fn list_latest(pool: &PgPool) -> Result<Vec<ForecastRecord>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {TABLE} \
             WHERE collection_time = (SELECT MAX(collection_time) FROM {TABLE})"
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, ForecastRecord>(&sql)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// One page of records in storage-default order. `page` starts at 1.
    pub async fn list(
        pool: &PgPool,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ForecastRecord>, AppError> {
        let offset = (page as i64 - 1) * limit as i64;
        let sql = format!("SELECT {COLUMNS} FROM {TABLE} OFFSET $1 LIMIT $2");
        tracing::debug!(sql = %sql, offset, limit, "query");
        let rows = sqlx::query_as::<_, ForecastRecord>(&sql)
            .bind(offset)
            .bind(limit as i64)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Insert a new record, stamping both audit timestamps. A primary-key
    /// collision comes back as a storage error from the unique constraint.
    pub async fn create(pool: &PgPool, input: ForecastInput) -> Result<ForecastRecord, AppError> {
        let record = ForecastRecord::from_input(input, Utc::now());
        let mut tx = pool.begin().await?;
        let sql = format!(
            "INSERT INTO {TABLE} ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        tracing::debug!(sql = %sql, collection_time = %record.collection_time, "insert");
        let stored = sqlx::query_as::<_, ForecastRecord>(&sql)
            .bind(record.collection_time)
            .bind(record.temperature)
            .bind(record.temperature_min)
            .bind(record.temperature_max)
            .bind(record.humidity)
            .bind(&record.description)
            .bind(record.feels_like)
            .bind(record.wind_speed)
            .bind(record.wind_direction)
            .bind(record.create_date)
            .bind(record.update_date)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(stored)
    }

    /// Fetch one record by key. Returns None when absent.
    pub async fn get(
        pool: &PgPool,
        id: DateTime<Utc>,
    ) -> Result<Option<ForecastRecord>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE collection_time = $1");
        tracing::debug!(sql = %sql, collection_time = %id, "query");
        let row = sqlx::query_as::<_, ForecastRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Full replace: every non-key column takes the input's value (unset
    /// fields become NULL) and `update_date` is refreshed.
    pub async fn replace(
        pool: &PgPool,
        id: DateTime<Utc>,
        input: ForecastInput,
    ) -> Result<Option<ForecastRecord>, AppError> {
        let mut tx = pool.begin().await?;
        let Some(mut record) = Self::get_for_update(&mut tx, id).await? else {
            return Ok(None);
        };
        record.apply_replace(&input);
        record.update_date = Utc::now();
        let stored = Self::persist(&mut tx, &record).await?;
        tx.commit().await?;
        Ok(Some(stored))
    }

    /// Partial update: only fields present in the patch are applied and
    /// `update_date` is refreshed.
    pub async fn patch(
        pool: &PgPool,
        id: DateTime<Utc>,
        patch: ForecastPatch,
    ) -> Result<Option<ForecastRecord>, AppError> {
        let mut tx = pool.begin().await?;
        let Some(mut record) = Self::get_for_update(&mut tx, id).await? else {
            return Ok(None);
        };
        record.apply_patch(&patch);
        record.update_date = Utc::now();
        let stored = Self::persist(&mut tx, &record).await?;
        tx.commit().await?;
        Ok(Some(stored))
    }

    /// Delete one record by key. Returns false when absent.
    pub async fn delete(pool: &PgPool, id: DateTime<Utc>) -> Result<bool, AppError> {
        let mut tx = pool.begin().await?;
        let sql = format!("DELETE FROM {TABLE} WHERE collection_time = $1");
        tracing::debug!(sql = %sql, collection_time = %id, "delete");
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_for_update(
        tx: &mut sqlx::PgConnection,
        id: DateTime<Utc>,
    ) -> Result<Option<ForecastRecord>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE collection_time = $1");
        tracing::debug!(sql = %sql, collection_time = %id, "query (tx)");
        let row = sqlx::query_as::<_, ForecastRecord>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        Ok(row)
    }

    /// Write every non-key column of `record` back and return the stored row.
    async fn persist(
        tx: &mut sqlx::PgConnection,
        record: &ForecastRecord,
    ) -> Result<ForecastRecord, AppError> {
        let sql = format!(
            "UPDATE {TABLE} SET temperature = $2, temperature_min = $3, temperature_max = $4, \
             humidity = $5, description = $6, feels_like = $7, wind_speed = $8, \
             wind_direction = $9, update_date = $10 \
             WHERE collection_time = $1 RETURNING {COLUMNS}"
        );
        tracing::debug!(sql = %sql, collection_time = %record.collection_time, "update (tx)");
        let stored = sqlx::query_as::<_, ForecastRecord>(&sql)
            .bind(record.collection_time)
            .bind(record.temperature)
            .bind(record.temperature_min)
            .bind(record.temperature_max)
            .bind(record.humidity)
            .bind(&record.description)
            .bind(record.feels_like)
            .bind(record.wind_speed)
            .bind(record.wind_direction)
            .bind(record.update_date)
            .fetch_one(&mut *tx)
            .await?;
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_list_matches_table_width() {
        assert_eq!(COLUMNS.split(',').count(), 11);
    }

    #[test]
    fn column_list_leads_with_primary_key() {
        assert!(COLUMNS.starts_with("collection_time"));
    }
}
