//! Transform module
//!
//! The core of the pipeline: reshapes the nested forecast document into a
//! flat, deterministic record batch.
//!
//! # Overview
//!
//! - Flattens `timelines.hourly[].values.*` into top-level columns
//! - Filters rows to a bounded America/Los_Angeles day window
//! - Renames columns camelCase → snake_case (and `time` → `time_unix` in
//!   rollover mode)
//! - Decomposes the location name into five broadcast columns
//! - Optionally coerces float-eligible columns to f64

mod types;

pub use types::{
    FilterMode, ForecastBatch, ForecastRow, HourlyEntry, Location, LocationFields,
    RawForecastDocument, Timelines, TransformOptions, NON_FLOAT_COLUMNS,
};

use crate::error::{Error, Result};
use chrono::{NaiveDate, SecondsFormat, Timelike};
use chrono_tz::America::Los_Angeles;
use serde_json::Value;
use tracing::debug;

/// Reshape a raw forecast document into a flat record batch.
///
/// Deterministic given identical inputs. Returns an empty batch (not an
/// error) when no hourly entry falls inside the day window.
pub fn transform(
    doc: &RawForecastDocument,
    reference_date: NaiveDate,
    options: &TransformOptions,
) -> Result<ForecastBatch> {
    let location = LocationFields::parse(&doc.location.name)?;

    let Some(first_entry) = doc.timelines.hourly.first() else {
        return Err(Error::schema("timelines.hourly is empty"));
    };

    let mut rows: Vec<ForecastRow> = Vec::new();
    for entry in &doc.timelines.hourly {
        // Local civil view is a filtering artifact only; it is never a column.
        let local = entry.time.with_timezone(&Los_Angeles);
        if !in_day_window(local.date_naive(), local.hour(), reference_date, options.mode) {
            continue;
        }

        let mut row = flatten_entry(entry, options.mode);
        row = rename_columns(row, options.mode)?;
        broadcast_location(&mut row, &location, &doc.location);

        if options.coerce_types {
            coerce_row(&mut row)?;
        }

        rows.push(row);
    }

    debug!(
        kept = rows.len(),
        total = doc.timelines.hourly.len(),
        mode = ?options.mode,
        "filtered hourly entries to day window"
    );

    // A zero-row batch is valid, but it still carries the full column set so
    // the landed object keeps a stable schema. Derive the columns from the
    // first hourly entry the same way a surviving row would.
    let columns = if rows.is_empty() {
        let mut template = flatten_entry(first_entry, options.mode);
        template = rename_columns(template, options.mode)?;
        broadcast_location(&mut template, &location, &doc.location);
        template.keys().cloned().collect()
    } else {
        uniform_columns(&rows)?
    };

    Ok(ForecastBatch { columns, rows })
}

/// Day-window membership for one entry's local civil date and hour.
fn in_day_window(
    local_date: NaiveDate,
    local_hour: u32,
    reference_date: NaiveDate,
    mode: FilterMode,
) -> bool {
    match mode {
        FilterMode::SingleDay => local_date == reference_date,
        FilterMode::RolloverMidnight => {
            local_date == reference_date
                || (local_hour == 0
                    && reference_date
                        .succ_opt()
                        .is_some_and(|next| local_date == next))
        }
    }
}

/// Build the candidate row for one hourly entry: the time column followed by
/// the entry's `values.*` children with the `values.` prefix stripped.
fn flatten_entry(entry: &HourlyEntry, mode: FilterMode) -> ForecastRow {
    let mut row = ForecastRow::new();

    let time_value = match mode {
        // Rollover variant persists epoch seconds (renamed to time_unix below).
        FilterMode::RolloverMidnight => Value::from(entry.time.timestamp()),
        FilterMode::SingleDay => {
            Value::String(entry.time.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
    };
    row.insert("time".to_string(), time_value);

    for (key, value) in &entry.values {
        let qualified = format!("values.{key}");
        row.insert(strip_values_prefix(&qualified).to_string(), value.clone());
    }

    row
}

/// Strip a leading `values.` from a column name by exact 7-character prefix
/// match. Only first-level nesting under `values` is unwrapped; deeper paths
/// keep their remaining segments.
pub fn strip_values_prefix(name: &str) -> &str {
    name.strip_prefix("values.").unwrap_or(name)
}

/// Convert a camelCase name to snake_case: insert an underscore before every
/// uppercase letter that is not the first character, then lowercase.
/// Idempotent: an already-snake_case name passes through unchanged.
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Apply the column-renaming pass to a whole row, preserving order.
///
/// Two source columns collapsing onto one normalized name would silently drop
/// data, so a post-rename collision is a schema error.
fn rename_columns(row: ForecastRow, mode: FilterMode) -> Result<ForecastRow> {
    let mut renamed = ForecastRow::new();
    for (name, value) in row {
        let name = if mode == FilterMode::RolloverMidnight && name == "time" {
            "time_unix".to_string()
        } else {
            name
        };
        let name = camel_to_snake(&name);
        if renamed.insert(name.clone(), value).is_some() {
            return Err(Error::schema(format!(
                "column name collision after renaming: '{name}'"
            )));
        }
    }
    Ok(renamed)
}

/// Append the constant-valued location and coordinate columns.
fn broadcast_location(row: &mut ForecastRow, fields: &LocationFields, location: &Location) {
    row.insert("city".to_string(), Value::String(fields.city.clone()));
    row.insert("county".to_string(), Value::String(fields.county.clone()));
    row.insert("state".to_string(), Value::String(fields.state.clone()));
    row.insert(
        "postal_code".to_string(),
        Value::String(fields.postal_code.clone()),
    );
    row.insert("country".to_string(), Value::String(fields.country.clone()));
    row.insert("lat".to_string(), Value::from(location.lat));
    row.insert("lon".to_string(), Value::from(location.lon));
}

/// Coerce every float-eligible cell to f64. Failure on any cell fails the
/// whole batch; no partial output.
fn coerce_row(row: &mut ForecastRow) -> Result<()> {
    for (column, value) in row.iter_mut() {
        if NON_FLOAT_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        *value = coerce_cell(column, value)?;
    }
    Ok(())
}

fn coerce_cell(column: &str, value: &Value) -> Result<Value> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| Error::coercion(column, value.to_string()))
}

/// Derive the batch column set and verify every row carries exactly it.
fn uniform_columns(rows: &[ForecastRow]) -> Result<Vec<String>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Vec<String> = first.keys().cloned().collect();

    for (idx, row) in rows.iter().enumerate().skip(1) {
        if row.len() != columns.len() || !columns.iter().all(|c| row.contains_key(c)) {
            return Err(Error::schema(format!(
                "row {idx} column set diverges from batch schema"
            )));
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests;
