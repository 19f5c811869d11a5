//! Database bootstrap: pool construction and `weather_forecast` DDL.

use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Connect a process-wide pool. Call once at startup and clone the handle
/// into shared state.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Idempotent DDL for the forecast table.
pub async fn ensure_forecast_table(pool: &PgPool) -> Result<(), AppError> {
    const DDL: &str = r#"
        CREATE TABLE IF NOT EXISTS weather_forecast (
            collection_time TIMESTAMPTZ PRIMARY KEY,
            temperature     INTEGER,
            temperature_min INTEGER,
            temperature_max INTEGER,
            humidity        INTEGER,
            description     VARCHAR(200),
            feels_like      DOUBLE PRECISION,
            wind_speed      DOUBLE PRECISION,
            wind_direction  INTEGER,
            create_date     TIMESTAMPTZ NOT NULL,
            update_date     TIMESTAMPTZ NOT NULL
        )
    "#;
    sqlx::query(DDL).execute(pool).await?;
    tracing::debug!("weather_forecast table ensured");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_is_last_path_segment() {
        let (admin, name) =
            parse_db_name_from_url("postgres://user:pw@localhost:5432/forecast").unwrap();
        assert_eq!(name, "forecast");
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
    }

    #[test]
    fn db_name_strips_query_params() {
        let (_, name) =
            parse_db_name_from_url("postgres://localhost/forecast?sslmode=disable").unwrap();
        assert_eq!(name, "forecast");
    }

    #[test]
    fn quoting_escapes_double_quotes() {
        assert_eq!(quote_ident("fore\"cast"), "\"fore\\\"cast\"");
    }
}
