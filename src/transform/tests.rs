//! Tests for the transform module

use super::*;
use chrono::{NaiveDate, TimeZone};
use chrono_tz::America::Los_Angeles;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

const LOCATION_NAME: &str = "Bakersfield, Kern, California, 93312, United States";

/// RFC 3339 UTC string for a Los Angeles civil date + hour.
fn la_hour_utc(date: NaiveDate, hour: u32) -> String {
    Los_Angeles
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
        .unwrap()
        .to_utc()
        .to_rfc3339()
}

fn document(times: &[String]) -> RawForecastDocument {
    let hourly: Vec<serde_json::Value> = times
        .iter()
        .map(|t| {
            json!({
                "time": t,
                "values": {
                    "temperature": 70.5,
                    "windSpeed": 3.2,
                    "cloudCover": 50,
                    "humidity": 40,
                    "weatherCode": 1000,
                }
            })
        })
        .collect();

    RawForecastDocument::from_value(json!({
        "timelines": { "hourly": hourly },
        "location": { "name": LOCATION_NAME, "lat": 35.3915, "lon": -119.1295 }
    }))
    .unwrap()
}

/// 25 entries: the full local reference day (hours 0-23) plus next-day local
/// midnight. The end-to-end scenario from the requirements.
fn full_day_document(reference: NaiveDate) -> RawForecastDocument {
    let mut times: Vec<String> = (0..24).map(|h| la_hour_utc(reference, h)).collect();
    times.push(la_hour_utc(reference.succ_opt().unwrap(), 0));
    document(&times)
}

// ============================================================================
// Column Renaming
// ============================================================================

#[test_case("cloudCover", "cloud_cover")]
#[test_case("uvHealthConcern", "uv_health_concern")]
#[test_case("temperatureApparent", "temperature_apparent")]
#[test_case("time", "time")]
#[test_case("wind_speed", "wind_speed"; "already snake case")]
fn test_camel_to_snake(input: &str, expected: &str) {
    assert_eq!(camel_to_snake(input), expected);
}

#[test]
fn test_camel_to_snake_idempotent() {
    for name in ["cloudCover", "uvIndex", "time", "precipitationProbability"] {
        let once = camel_to_snake(name);
        assert_eq!(camel_to_snake(&once), once);
    }
}

#[test_case("values.cloudCover", "cloudCover")]
#[test_case("values.nested.deep", "nested.deep"; "only first level unwrapped")]
#[test_case("time", "time"; "no prefix")]
#[test_case("value.cloudCover", "value.cloudCover"; "exact prefix only")]
fn test_strip_values_prefix(input: &str, expected: &str) {
    assert_eq!(strip_values_prefix(input), expected);
}

// ============================================================================
// Location Decomposition
// ============================================================================

#[test]
fn test_location_parse_five_parts() {
    let fields = LocationFields::parse(LOCATION_NAME).unwrap();
    assert_eq!(fields.city, "Bakersfield");
    assert_eq!(fields.county, "Kern");
    assert_eq!(fields.state, "California");
    assert_eq!(fields.postal_code, "93312");
    assert_eq!(fields.country, "United States");
}

#[test]
fn test_location_parse_too_few_parts() {
    let err = LocationFields::parse("Berlin, Berlin, 10115, Germany").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

// ============================================================================
// Document Shape
// ============================================================================

#[test]
fn test_missing_hourly_is_schema_error() {
    let err = RawForecastDocument::from_value(json!({
        "timelines": {},
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn test_missing_location_is_schema_error() {
    let err = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [] }
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

// ============================================================================
// Day-Window Filter
// ============================================================================

#[test]
fn test_single_day_keeps_only_reference_date() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);

    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();
    assert_eq!(batch.num_rows(), 24);

    for row in &batch.rows {
        let time = row["time"].as_str().unwrap();
        let local = time
            .parse::<chrono::DateTime<chrono::Utc>>()
            .unwrap()
            .with_timezone(&Los_Angeles);
        assert_eq!(local.date_naive(), reference);
    }
}

#[test]
fn test_rollover_keeps_next_day_midnight() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);

    let options = TransformOptions {
        mode: FilterMode::RolloverMidnight,
        coerce_types: true,
    };
    let batch = transform(&doc, reference, &options).unwrap();
    assert_eq!(batch.num_rows(), 25);
}

#[test]
fn test_rollover_excludes_next_day_one_am() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let next = reference.succ_opt().unwrap();
    let times = vec![
        la_hour_utc(reference, 23),
        la_hour_utc(next, 0),
        la_hour_utc(next, 1),
    ];
    let doc = document(&times);

    let options = TransformOptions {
        mode: FilterMode::RolloverMidnight,
        coerce_types: true,
    };
    let batch = transform(&doc, reference, &options).unwrap();
    assert_eq!(batch.num_rows(), 2);
}

#[test]
fn test_winter_date_uses_pst_offset() {
    // PST is UTC-8; local midnight 2024-01-15 is 08:00Z.
    let reference = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let doc = full_day_document(reference);

    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();
    assert_eq!(batch.num_rows(), 24);
    assert_eq!(
        batch.rows[0]["time"].as_str().unwrap(),
        "2024-01-15T08:00:00Z"
    );
}

#[test]
fn test_no_surviving_rows_yields_empty_batch_with_columns() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let far_away = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let doc = full_day_document(far_away);

    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();
    assert!(batch.is_empty());
    // The column set stays stable even with zero rows.
    assert_eq!(batch.num_columns(), 13);
    assert!(batch.columns.contains(&"time".to_string()));
    assert!(batch.columns.contains(&"country".to_string()));
}

#[test]
fn test_empty_hourly_is_schema_error() {
    let doc = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [] },
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap();

    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let err = transform(&doc, reference, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

// ============================================================================
// Schema Shape
// ============================================================================

#[test]
fn test_schema_uniform_across_rows() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);
    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();

    for row in &batch.rows {
        assert_eq!(row.len(), batch.num_columns());
        for column in &batch.columns {
            assert!(row.contains_key(column), "row missing column {column}");
        }
    }
}

#[test]
fn test_column_names_and_order() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);
    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();

    assert_eq!(
        batch.columns,
        vec![
            "time",
            "temperature",
            "wind_speed",
            "cloud_cover",
            "humidity",
            "weather_code",
            "city",
            "county",
            "state",
            "postal_code",
            "country",
            "lat",
            "lon",
        ]
    );
}

#[test]
fn test_rollover_renames_time_to_unix_seconds() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);

    let options = TransformOptions {
        mode: FilterMode::RolloverMidnight,
        coerce_types: true,
    };
    let batch = transform(&doc, reference, &options).unwrap();

    assert!(batch.columns.contains(&"time_unix".to_string()));
    assert!(!batch.columns.contains(&"time".to_string()));

    // Local midnight PDT of the reference date is 07:00Z.
    let expected = chrono::Utc
        .with_ymd_and_hms(2024, 6, 15, 7, 0, 0)
        .unwrap()
        .timestamp();
    assert_eq!(batch.rows[0]["time_unix"].as_i64().unwrap(), expected);
}

#[test]
fn test_broadcast_columns_constant() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);
    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();

    for row in &batch.rows {
        assert_eq!(row["city"], json!("Bakersfield"));
        assert_eq!(row["county"], json!("Kern"));
        assert_eq!(row["postal_code"], json!("93312"));
        assert_eq!(row["lat"], json!(35.3915));
        assert_eq!(row["lon"], json!(-119.1295));
    }
}

#[test]
fn test_rename_collision_is_schema_error() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [{
            "time": la_hour_utc(reference, 12),
            "values": { "cloudCover": 50, "cloud_cover": 51 }
        }]},
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap();

    let err = transform(&doc, reference, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

// ============================================================================
// Type Coercion
// ============================================================================

#[test]
fn test_coercion_excludes_integer_coded_metrics() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = full_day_document(reference);
    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();

    let row = &batch.rows[0];
    assert!(row["weather_code"].is_i64(), "weather_code must stay integer");
    assert!(row["cloud_cover"].is_i64());
    assert!(row["humidity"].is_i64());
    assert!(row["temperature"].is_f64());
    // Integer-valued float-eligible metrics still become floats.
    assert!(row["wind_speed"].is_f64());
}

#[test]
fn test_coercion_parses_numeric_strings() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [{
            "time": la_hour_utc(reference, 12),
            "values": { "temperature": "72.5" }
        }]},
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap();

    let batch = transform(&doc, reference, &TransformOptions::default()).unwrap();
    assert_eq!(batch.rows[0]["temperature"].as_f64().unwrap(), 72.5);
}

#[test]
fn test_coercion_failure_fails_whole_batch() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [{
            "time": la_hour_utc(reference, 12),
            "values": { "temperature": 70.0, "moonPhase": "waxing" }
        }]},
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap();

    let err = transform(&doc, reference, &TransformOptions::default()).unwrap_err();
    match err {
        Error::TypeCoercion { column, .. } => assert_eq!(column, "moon_phase"),
        other => panic!("expected TypeCoercion, got {other}"),
    }
}

#[test]
fn test_no_coercion_preserves_value_kinds() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let doc = RawForecastDocument::from_value(json!({
        "timelines": { "hourly": [{
            "time": la_hour_utc(reference, 12),
            "values": { "temperature": 70, "moonPhase": "waxing" }
        }]},
        "location": { "name": LOCATION_NAME, "lat": 0.0, "lon": 0.0 }
    }))
    .unwrap();

    let options = TransformOptions {
        mode: FilterMode::SingleDay,
        coerce_types: false,
    };
    let batch = transform(&doc, reference, &options).unwrap();
    assert!(batch.rows[0]["temperature"].is_i64());
    assert_eq!(batch.rows[0]["moon_phase"], json!("waxing"));
}

// ============================================================================
// Filter Mode Parsing
// ============================================================================

#[test_case("single-day", FilterMode::SingleDay)]
#[test_case("rollover", FilterMode::RolloverMidnight)]
#[test_case("rollover-midnight", FilterMode::RolloverMidnight)]
#[test_case("Single_Day", FilterMode::SingleDay; "case insensitive")]
fn test_filter_mode_from_str(input: &str, expected: FilterMode) {
    assert_eq!(input.parse::<FilterMode>().unwrap(), expected);
}

#[test]
fn test_filter_mode_from_str_rejects_unknown() {
    assert!("weekly".parse::<FilterMode>().is_err());
}
