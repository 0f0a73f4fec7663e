//! forecast-ingest CLI
//!
//! Fetches hourly forecast readings, normalizes them into a flat columnar
//! batch, and lands the result as Parquet in object storage.

use clap::Parser;
use forecast_ingest::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
