//! Forecast record and its input schemas.
//!
//! `ForecastRecord` mirrors the `weather_forecast` table one column per
//! field. `ForecastInput` is the write schema shared by POST and PUT;
//! `ForecastPatch` tracks field presence so PATCH can tell an omitted field
//! from an explicit `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// One row of `weather_forecast`, keyed by collection time.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ForecastRecord {
    pub collection_time: DateTime<Utc>,
    pub temperature: Option<i32>,
    pub temperature_min: Option<i32>,
    pub temperature_max: Option<i32>,
    pub humidity: Option<i32>,
    pub description: Option<String>,
    pub feels_like: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<i32>,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

/// Write schema for POST and PUT. `collection_time` is required; every other
/// column is optional and unset fields stay NULL. Audit timestamps are
/// server-stamped, so the schema rejects them like any unknown field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastInput {
    pub collection_time: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<i32>,
    #[serde(default)]
    pub temperature_min: Option<i32>,
    #[serde(default)]
    pub temperature_max: Option<i32>,
    #[serde(default)]
    pub humidity: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_direction: Option<i32>,
}

/// Patch schema for PATCH. Outer `Option` is field presence, inner `Option`
/// is the value; `collection_time` is immutable and therefore not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastPatch {
    #[serde(default, with = "serde_with::rust::double_option")]
    pub temperature: Option<Option<i32>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub temperature_min: Option<Option<i32>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub temperature_max: Option<Option<i32>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub humidity: Option<Option<i32>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub feels_like: Option<Option<f64>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub wind_speed: Option<Option<f64>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub wind_direction: Option<Option<i32>>,
}

/// VARCHAR(200) bound on `description`.
const DESCRIPTION_MAX_CHARS: usize = 200;

fn check_description(description: Option<&str>) -> Result<(), AppError> {
    if let Some(s) = description {
        if s.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    Ok(())
}

fn check_wind_direction(degrees: Option<i32>) -> Result<(), AppError> {
    if let Some(d) = degrees {
        if !(0..=360).contains(&d) {
            return Err(AppError::Validation(
                "wind_direction must be between 0 and 360 degrees".into(),
            ));
        }
    }
    Ok(())
}

impl ForecastInput {
    pub fn validate(&self) -> Result<(), AppError> {
        check_description(self.description.as_deref())?;
        check_wind_direction(self.wind_direction)?;
        Ok(())
    }
}

impl ForecastPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(d) = &self.description {
            check_description(d.as_deref())?;
        }
        if let Some(w) = self.wind_direction {
            check_wind_direction(w)?;
        }
        Ok(())
    }
}

impl ForecastRecord {
    /// Build a new record from provided fields, stamping both audit
    /// timestamps to the same instant.
    pub fn from_input(input: ForecastInput, now: DateTime<Utc>) -> Self {
        ForecastRecord {
            collection_time: input.collection_time,
            temperature: input.temperature,
            temperature_min: input.temperature_min,
            temperature_max: input.temperature_max,
            humidity: input.humidity,
            description: input.description,
            feels_like: input.feels_like,
            wind_speed: input.wind_speed,
            wind_direction: input.wind_direction,
            create_date: now,
            update_date: now,
        }
    }

    /// Full-replace merge: every non-key column takes the input's value,
    /// fields the input left unset become NULL. The primary key and
    /// `create_date` are never touched.
    pub fn apply_replace(&mut self, input: &ForecastInput) {
        self.temperature = input.temperature;
        self.temperature_min = input.temperature_min;
        self.temperature_max = input.temperature_max;
        self.humidity = input.humidity;
        self.description = input.description.clone();
        self.feels_like = input.feels_like;
        self.wind_speed = input.wind_speed;
        self.wind_direction = input.wind_direction;
    }

    /// Partial merge: only fields present in the patch are applied; an
    /// explicit `null` clears the column.
    pub fn apply_patch(&mut self, patch: &ForecastPatch) {
        if let Some(v) = patch.temperature {
            self.temperature = v;
        }
        if let Some(v) = patch.temperature_min {
            self.temperature_min = v;
        }
        if let Some(v) = patch.temperature_max {
            self.temperature_max = v;
        }
        if let Some(v) = patch.humidity {
            self.humidity = v;
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = patch.feels_like {
            self.feels_like = v;
        }
        if let Some(v) = patch.wind_speed {
            self.wind_speed = v;
        }
        if let Some(v) = patch.wind_direction {
            self.wind_direction = v;
        }
    }
}
