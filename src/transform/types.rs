//! Transform types
//!
//! The raw API document, the flat output batch, and the knobs that select
//! between the filtering/coercion variants.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Columns that are never coerced to float.
///
/// `cloud_cover`, `humidity`, `uv_health_concern`, `uv_index` and
/// `weather_code` are integer-coded metrics; the time and location columns
/// are strings (or epoch seconds for `time_unix`). Any column outside this
/// set is float-eligible, so newly introduced API metrics default to float
/// coercion (fail-open).
pub const NON_FLOAT_COLUMNS: &[&str] = &[
    "time",
    "time_unix",
    "cloud_cover",
    "humidity",
    "uv_health_concern",
    "uv_index",
    "weather_code",
    "city",
    "county",
    "state",
    "postal_code",
    "country",
];

/// Day-window filtering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterMode {
    /// Keep only rows whose America/Los_Angeles civil date equals the
    /// reference date. The time column stays `time` (RFC 3339 string).
    #[default]
    SingleDay,
    /// Keep the reference date plus the next day's local-midnight hour, so a
    /// full local day is available even when the last UTC-aligned hour does
    /// not land on local midnight. The time column becomes `time_unix`
    /// (epoch seconds).
    RolloverMidnight,
}

impl std::str::FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single-day" | "single_day" => Ok(Self::SingleDay),
            "rollover" | "rollover-midnight" | "rollover_midnight" => Ok(Self::RolloverMidnight),
            other => Err(Error::invalid_value(
                "filter mode",
                format!("expected 'single-day' or 'rollover-midnight', got '{other}'"),
            )),
        }
    }
}

/// Options selecting the transform variant
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Day-window filtering policy
    pub mode: FilterMode,
    /// Coerce float-eligible columns to f64 (strict variant)
    pub coerce_types: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::SingleDay,
            coerce_types: true,
        }
    }
}

// ============================================================================
// Raw API document
// ============================================================================

/// The forecast API response: a single location plus an hourly timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastDocument {
    /// Timeline container
    pub timelines: Timelines,
    /// Forecast location
    pub location: Location,
}

/// Timeline container; only the hourly resolution is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct Timelines {
    /// Per-hour readings, chronological ascending
    pub hourly: Vec<HourlyEntry>,
}

/// One hourly reading
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyEntry {
    /// UTC instant of the reading
    pub time: DateTime<Utc>,
    /// Nested weather metrics, keyed camelCase by the API
    pub values: Map<String, Value>,
}

/// Forecast location as reported by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    /// Display name of form "City, County, State, PostalCode, Country"
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl RawForecastDocument {
    /// Deserialize the API body, failing with a schema error when required
    /// keys (`timelines.hourly`, `location`) are absent or malformed.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::schema(format!("unexpected API document shape: {e}")))
    }
}

/// The five components of a decomposed location name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    pub city: String,
    pub county: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl LocationFields {
    /// Split a location name on the literal `", "` delimiter.
    ///
    /// The name must decompose into exactly five parts; a county-less
    /// address is a schema error, not a best-effort parse.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split(", ").collect();
        match parts.as_slice() {
            [city, county, state, postal_code, country] => Ok(Self {
                city: (*city).to_string(),
                county: (*county).to_string(),
                state: (*state).to_string(),
                postal_code: (*postal_code).to_string(),
                country: (*country).to_string(),
            }),
            _ => Err(Error::schema(format!(
                "location name '{name}' split into {} parts, expected 5 \
                 (city, county, state, postal code, country)",
                parts.len()
            ))),
        }
    }
}

// ============================================================================
// Output batch
// ============================================================================

/// One flat output record: normalized column name to value, insertion order
/// is column order (serde_json is built with `preserve_order`).
pub type ForecastRow = Map<String, Value>;

/// The ordered record set produced by one run.
#[derive(Debug, Clone, Default)]
pub struct ForecastBatch {
    /// Column names in first-seen order; every row has exactly this set
    pub columns: Vec<String>,
    /// Surviving rows in source (chronological) order
    pub rows: Vec<ForecastRow>,
}

impl ForecastBatch {
    /// Number of rows in the batch
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the batch
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when no row survived the day-window filter
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
