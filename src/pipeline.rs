//! Pipeline orchestration
//!
//! Strictly linear: fetch, transform, write. Transform-stage errors are
//! fatal (no partial output is ever persisted); only the storage write is
//! caught so the invoking trigger receives a structured failure signal.

use crate::config::RunConfig;
use crate::error::Result;
use crate::fetch::{Fetcher, FetcherConfig};
use crate::output::{batch_to_arrow, write_parquet_buffer, ObjectStoreSink};
use crate::transform::{transform, TransformOptions};
use chrono::{NaiveDate, Utc};
use chrono_tz::America::Los_Angeles;
use tracing::{info, warn};

/// Result of one pipeline run, returned to the invoking trigger.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Run identifier, the reference date formatted `MM-DD-YYYY`
    pub run_id: String,
    /// Rows in the output batch
    pub rows: usize,
    /// Whether the object was written to storage
    pub uploaded: bool,
    /// Full object path when the write succeeded
    pub object_path: Option<String>,
}

/// One fetch-transform-write run with explicitly injected collaborators.
///
/// Each run constructs its document, batch and buffer fresh; no state
/// crosses run boundaries.
pub struct Pipeline {
    fetcher: Fetcher,
    sink: ObjectStoreSink,
    options: TransformOptions,
}

impl Pipeline {
    /// Assemble a pipeline from explicit collaborators.
    pub fn new(fetcher: Fetcher, sink: ObjectStoreSink, options: TransformOptions) -> Self {
        Self {
            fetcher,
            sink,
            options,
        }
    }

    /// Assemble a pipeline from a run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let fetcher = Fetcher::new(
            FetcherConfig::new(
                config.api_url.clone(),
                config.api_key.clone(),
                config.location.clone(),
                config.units.clone(),
            )
            .with_timeout(config.timeout),
        )?;
        let sink = ObjectStoreSink::parse(&config.output_url)?;

        Ok(Self::new(fetcher, sink, config.options))
    }

    /// Execute one run.
    ///
    /// `reference_date` defaults to today's America/Los_Angeles civil date.
    /// With `dry_run` the batch is built and serialized but never written.
    pub async fn run(&self, reference_date: Option<NaiveDate>, dry_run: bool) -> Result<RunOutcome> {
        let reference_date = reference_date.unwrap_or_else(today_in_los_angeles);
        let run_id = run_identifier(reference_date);
        info!(%run_id, mode = ?self.options.mode, "starting forecast run");

        let document = self.fetcher.fetch().await?;
        let batch = transform(&document, reference_date, &self.options)?;

        if batch.is_empty() {
            // Valid but worth surfacing: no hourly entry fell in the window.
            warn!(%run_id, "no rows survived the day-window filter");
        }

        let record_batch = batch_to_arrow(&batch)?;
        let buffer = write_parquet_buffer(&record_batch, None)?;

        if dry_run {
            info!(
                %run_id,
                rows = batch.num_rows(),
                columns = batch.num_columns(),
                bytes = buffer.len(),
                "dry run, skipping upload"
            );
            return Ok(RunOutcome {
                run_id,
                rows: batch.num_rows(),
                uploaded: false,
                object_path: None,
            });
        }

        match self.sink.put(&run_id, buffer).await {
            Ok(path) => {
                info!(
                    %run_id,
                    rows = batch.num_rows(),
                    columns = batch.num_columns(),
                    path = %path,
                    "forecast run complete"
                );
                Ok(RunOutcome {
                    run_id,
                    rows: batch.num_rows(),
                    uploaded: true,
                    object_path: Some(path),
                })
            }
            Err(e) => {
                warn!(%run_id, error = %e, "storage write failed");
                Ok(RunOutcome {
                    run_id,
                    rows: batch.num_rows(),
                    uploaded: false,
                    object_path: None,
                })
            }
        }
    }
}

/// Today's civil date in America/Los_Angeles.
pub fn today_in_los_angeles() -> NaiveDate {
    Utc::now().with_timezone(&Los_Angeles).date_naive()
}

/// Run identifier for a reference date: `MM-DD-YYYY`.
pub fn run_identifier(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}
