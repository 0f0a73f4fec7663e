//! Run configuration
//!
//! Everything the pipeline needs is injected via environment variables;
//! nothing is hard-coded in the core logic and no client is constructed at
//! module load. S3 credentials and region are picked up by the object store
//! builder itself (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
//! `AWS_DEFAULT_REGION`).

use crate::error::{Error, Result};
use crate::transform::{FilterMode, TransformOptions};
use std::time::Duration;
use url::Url;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Forecast endpoint base URL
    pub api_url: Url,
    /// Forecast API key
    pub api_key: String,
    /// Location query string passed to the API
    pub location: String,
    /// Unit system (`imperial` or `metric`)
    pub units: String,
    /// Output destination: `s3://bucket/prefix` or a local path
    pub output_url: String,
    /// Transform variant selection
    pub options: TransformOptions,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl RunConfig {
    /// Load the run configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let api_url: Url = required("FORECAST_API_URL")?
            .parse()
            .map_err(Error::InvalidUrl)?;

        let mode = match optional("FORECAST_FILTER_MODE") {
            Some(raw) => raw.parse::<FilterMode>()?,
            None => FilterMode::default(),
        };
        let coerce_types = match optional("FORECAST_COERCE_TYPES") {
            Some(raw) => parse_bool("FORECAST_COERCE_TYPES", &raw)?,
            None => true,
        };
        let timeout_secs = match optional("FORECAST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::invalid_value("FORECAST_TIMEOUT_SECS", format!("not a number: '{raw}'"))
            })?,
            None => 30,
        };

        Ok(Self {
            api_url,
            api_key: required("FORECAST_API_KEY")?,
            location: required("FORECAST_LOCATION")?,
            units: optional("FORECAST_UNITS").unwrap_or_else(|| "imperial".to_string()),
            output_url: required("FORECAST_OUTPUT_URL")?,
            options: TransformOptions { mode, coerce_types },
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::missing_field(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(Error::invalid_value(
            field,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("F", "true").unwrap());
        assert!(parse_bool("F", "1").unwrap());
        assert!(!parse_bool("F", "FALSE").unwrap());
        assert!(parse_bool("F", "maybe").is_err());
    }

    #[test]
    fn test_from_env_round_trip() {
        std::env::set_var("FORECAST_API_URL", "https://api.example.com/v4/weather/forecast");
        std::env::set_var("FORECAST_API_KEY", "test-key");
        std::env::set_var("FORECAST_LOCATION", "93312 US");
        std::env::set_var("FORECAST_OUTPUT_URL", "s3://forecast-bucket");
        std::env::set_var("FORECAST_FILTER_MODE", "rollover");
        std::env::set_var("FORECAST_COERCE_TYPES", "false");

        let config = RunConfig::from_env().unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.example.com/v4/weather/forecast");
        assert_eq!(config.units, "imperial");
        assert_eq!(config.options.mode, FilterMode::RolloverMidnight);
        assert!(!config.options.coerce_types);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_required_var() {
        std::env::remove_var("FORECAST_API_URL_ABSENT");
        let err = required("FORECAST_API_URL_ABSENT").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }
}
