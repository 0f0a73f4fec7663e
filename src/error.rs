//! Error types for forecast-ingest
//!
//! One error enum for the whole pipeline. All public APIs return
//! `Result<T, Error>` where Error is defined here.
//!
//! Transform-stage errors (`Schema`, `TypeCoercion`) are always fatal to the
//! run; only the final storage write is caught at the pipeline boundary.

use thiserror::Error;

/// The main error type for forecast-ingest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config variable: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Transform Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Cannot coerce column '{column}' value {value} to float")]
    TypeCoercion { column: String, value: String },

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Storage write failed: {0}")]
    Sink(#[from] object_store::Error),

    // ============================================================================
    // I/O and Generic Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config variable error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a type coercion error
    pub fn coercion(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TypeCoercion {
            column: column.into(),
            value: value.into(),
        }
    }

    /// True for errors raised by the transform stage (always fatal to the run)
    pub fn is_transform_error(&self) -> bool {
        matches!(self, Error::Schema { .. } | Error::TypeCoercion { .. })
    }

    /// True for storage-layer failures (caught at the pipeline boundary)
    pub fn is_sink_error(&self) -> bool {
        matches!(self, Error::Sink(_))
    }
}

/// Result type alias for forecast-ingest
pub type Result<T> = std::result::Result<T, Error>;
