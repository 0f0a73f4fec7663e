//! Forecast API client

use crate::error::{Error, Result};
use crate::transform::RawForecastDocument;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Hourly resolution is the only one the pipeline consumes.
const TIMESTEPS: &str = "1h";

/// Configuration for the forecast fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Forecast endpoint
    pub endpoint: Url,
    /// API key, sent as the `apikey` query parameter
    pub api_key: String,
    /// Location query string (e.g. a postal code or "lat,lon")
    pub location: String,
    /// Unit system (`imperial` or `metric`)
    pub units: String,
    /// Request timeout; a hung remote otherwise blocks the run forever
    pub timeout: Duration,
}

impl FetcherConfig {
    /// Create a config with the default 30 second timeout.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        location: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            location: location.into(),
            units: units.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Forecast API fetcher wrapping a reqwest client
#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Build a fetcher for the configured endpoint.
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("forecast-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Perform the single GET and parse the forecast document.
    ///
    /// Any non-2xx status or transport failure is an error; the caller does
    /// not retry.
    pub async fn fetch(&self) -> Result<RawForecastDocument> {
        debug!(endpoint = %self.config.endpoint, "fetching forecast");

        let response = self
            .client
            .get(self.config.endpoint.clone())
            // accept-encoding (deflate, gzip, br) is negotiated by reqwest's
            // compression features; setting it by hand would disable
            // transparent decompression.
            .header("accept", "application/json")
            .query(&[
                ("location", self.config.location.as_str()),
                ("timesteps", TIMESTEPS),
                ("units", self.config.units.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body: Value = response.json().await?;
        RawForecastDocument::from_value(body)
    }
}
