//! Command-line interface

use crate::config::RunConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::transform::FilterMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;

/// Hourly weather-forecast ingestion
#[derive(Debug, Parser)]
#[command(name = "forecast-ingest", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the forecast, normalize it, and land it in object storage
    Run {
        /// Reference date (YYYY-MM-DD); defaults to today in America/Los_Angeles
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Day-window filter mode override
        #[arg(long, value_enum)]
        mode: Option<FilterMode>,

        /// Disable float coercion of metric columns
        #[arg(long)]
        no_coerce: bool,

        /// Output destination override (s3://bucket/prefix or local path)
        #[arg(long)]
        output: Option<String>,

        /// Build and serialize the batch without uploading
        #[arg(long)]
        dry_run: bool,
    },
}

/// Execute a parsed CLI invocation.
///
/// Prints the run outcome as one JSON object on stdout so the invoking
/// trigger can consume the status and run identifier.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            date,
            mode,
            no_coerce,
            output,
            dry_run,
        } => {
            let mut config = RunConfig::from_env()?;
            if let Some(mode) = mode {
                config.options.mode = mode;
            }
            if no_coerce {
                config.options.coerce_types = false;
            }
            if let Some(output) = output {
                config.output_url = output;
            }

            let pipeline = Pipeline::from_config(&config)?;
            let outcome = pipeline.run(date, dry_run).await?;

            println!(
                "{}",
                json!({
                    "run_id": outcome.run_id,
                    "rows": outcome.rows,
                    "uploaded": outcome.uploaded,
                    "object_path": outcome.object_path,
                })
            );
            Ok(())
        }
    }
}
