//! # forecast-ingest
//!
//! Retrieves hourly weather-forecast readings from a remote API, reshapes
//! the nested response into a flat tabular record stream with a
//! deterministic schema, and persists the result as compressed Parquet in
//! keyed object storage.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forecast_ingest::{config::RunConfig, pipeline::Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = RunConfig::from_env()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let outcome = pipeline.run(None, false).await?;
//!     println!("{} rows, uploaded: {}", outcome.rows, outcome.uploaded);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Fetcher ──► Transformer ──► Sink
//!   one GET     flatten          Arrow RecordBatch
//!               day-window       snappy Parquet buffer
//!               rename           put raw/{MM-DD-YYYY}.parquet
//!               split location
//!               coerce
//! ```
//!
//! Control flow is strictly linear; there is no retry, branching, or shared
//! state across runs.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

/// Error types for the pipeline
pub mod error;

/// Environment-driven run configuration
pub mod config;

/// Forecast API fetcher
pub mod fetch;

/// The reshape/normalize core
pub mod transform;

/// Arrow/Parquet serialization and object-storage sink
pub mod output;

/// Fetch-transform-write orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunOutcome};
pub use transform::{transform, FilterMode, ForecastBatch, TransformOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
