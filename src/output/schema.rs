//! Arrow schema derivation and batch conversion
//!
//! Turns a `ForecastBatch` into an Arrow `RecordBatch` with a typed schema.
//! Field order is the batch column order (first-seen order), so the columnar
//! layout is deterministic for identical inputs.

use crate::error::{Error, Result};
use crate::transform::ForecastBatch;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;

/// Convert a forecast batch into an Arrow RecordBatch.
///
/// Column types are derived from the cell values: Int64 for integer-coded
/// metrics, Float64 for coerced metrics and coordinates, Utf8 for the time
/// and location columns. An empty batch yields an empty RecordBatch with an
/// empty schema.
pub fn batch_to_arrow(batch: &ForecastBatch) -> Result<RecordBatch> {
    if batch.num_columns() == 0 {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for column in &batch.columns {
        let values: Vec<&Value> = batch
            .rows
            .iter()
            .map(|row| row.get(column).unwrap_or(&Value::Null))
            .collect();

        let data_type = derive_type(column, &values);
        let array = build_array(&values, &data_type)?;
        fields.push(Field::new(column, data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(Error::Arrow)
}

/// Derive the Arrow type for one column by merging its cell types. A column
/// with no non-null cells (or no rows at all) falls back to the declared
/// schema kind so zero-row batches keep a stable layout.
fn derive_type(column: &str, values: &[&Value]) -> DataType {
    let mut merged = DataType::Null;
    for value in values {
        let cell = match value {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Boolean,
            Value::Number(n) if n.is_i64() => DataType::Int64,
            Value::Number(_) => DataType::Float64,
            _ => DataType::Utf8,
        };
        merged = merge_types(&merged, &cell);
    }
    if merged == DataType::Null {
        declared_type(column)
    } else {
        merged
    }
}

/// The declared kind of a column under the strict (coerced) schema.
fn declared_type(column: &str) -> DataType {
    match column {
        "time" | "city" | "county" | "state" | "postal_code" | "country" => DataType::Utf8,
        "time_unix" | "cloud_cover" | "humidity" | "uv_health_concern" | "uv_index"
        | "weather_code" => DataType::Int64,
        _ => DataType::Float64,
    }
}

/// Merge two cell types into a compatible column type.
fn merge_types(left: &DataType, right: &DataType) -> DataType {
    match (left, right) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

fn build_array(values: &[&Value], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.as_bool()).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.as_i64()).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64)))
                .collect();
            Ok(Arc::new(arr))
        }

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }
    }
}
