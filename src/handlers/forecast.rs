//! Forecast CRUD handlers.
//!
//! Each handler validates its input, delegates to [`ForecastService`], and
//! returns the stored row as a flat column/value object. Success status is
//! 200 across the board, POST included.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::model::{ForecastInput, ForecastPatch, ForecastRecord};
use crate::response::Detail;
use crate::service::ForecastService;
use crate::state::AppState;

/// Query parameters for the paginated list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl ListParams {
    fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        if !(1..=100).contains(&self.limit) {
            return Err(AppError::Validation(
                "limit must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// The `{id}` segment addresses a `collection_time`: RFC 3339, or integer
/// Unix seconds. Anything else is a 400.
fn parse_id(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(secs) = raw.parse::<i64>() {
        if let Some(ts) = DateTime::from_timestamp(secs, 0) {
            return Ok(ts);
        }
    }
    Err(AppError::BadRequest(format!(
        "invalid forecast id '{}'",
        raw
    )))
}

/// GET /api/v1/forecast/latest
pub async fn latest(State(state): State<AppState>) -> Result<Json<Vec<ForecastRecord>>, AppError> {
    let rows = ForecastService::list_latest(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/v1/forecast
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ForecastRecord>>, AppError> {
    params.validate()?;
    let rows = ForecastService::list(&state.pool, params.page, params.limit).await?;
    Ok(Json(rows))
}

/// POST /api/v1/forecast
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ForecastInput>,
) -> Result<Json<ForecastRecord>, AppError> {
    input.validate()?;
    let row = ForecastService::create(&state.pool, input).await?;
    Ok(Json(row))
}

/// GET /api/v1/forecast/{id}
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<ForecastRecord>, AppError> {
    let id = parse_id(&id_str)?;
    let row = ForecastService::get(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(Json(row))
}

/// PUT /api/v1/forecast/{id}
pub async fn replace(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(input): Json<ForecastInput>,
) -> Result<Json<ForecastRecord>, AppError> {
    let id = parse_id(&id_str)?;
    input.validate()?;
    let row = ForecastService::replace(&state.pool, id, input)
        .await?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(Json(row))
}

/// PATCH /api/v1/forecast/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<ForecastPatch>,
) -> Result<Json<ForecastRecord>, AppError> {
    let id = parse_id(&id_str)?;
    body.validate()?;
    let row = ForecastService::patch(&state.pool, id, body)
        .await?
        .ok_or(AppError::NotFound(id_str))?;
    Ok(Json(row))
}

/// DELETE /api/v1/forecast/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Detail>, AppError> {
    let id = parse_id(&id_str)?;
    if !ForecastService::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(id_str));
    }
    Ok(Json(Detail::new(format!(
        "Forecast with id {} deleted successfully",
        id_str
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_accepts_rfc3339() {
        let id = parse_id("2025-01-01T00:00:00Z").unwrap();
        assert_eq!(id, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn id_accepts_rfc3339_with_offset() {
        let id = parse_id("2025-01-01T02:00:00+02:00").unwrap();
        assert_eq!(id, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn id_accepts_unix_seconds() {
        let id = parse_id("999999").unwrap();
        assert_eq!(id, DateTime::from_timestamp(999999, 0).unwrap());
    }

    #[test]
    fn id_rejects_garbage() {
        assert!(parse_id("not-a-time").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn list_params_default_to_first_page_of_ten() {
        let params: ListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn list_params_enforce_bounds() {
        let zero_page: ListParams =
            serde_json::from_value(serde_json::json!({"page": 0})).unwrap();
        assert!(zero_page.validate().is_err());

        let zero_limit: ListParams =
            serde_json::from_value(serde_json::json!({"limit": 0})).unwrap();
        assert!(zero_limit.validate().is_err());

        let over_limit: ListParams =
            serde_json::from_value(serde_json::json!({"limit": 101})).unwrap();
        assert!(over_limit.validate().is_err());

        let max_limit: ListParams =
            serde_json::from_value(serde_json::json!({"limit": 100})).unwrap();
        assert!(max_limit.validate().is_ok());
    }
}
