//! Output module
//!
//! Serializes a `ForecastBatch` into a compressed columnar buffer and lands
//! it in object storage.
//!
//! # Overview
//!
//! - Typed Arrow schema derivation and RecordBatch construction
//! - In-memory Parquet serialization (snappy by default)
//! - Object-store sink writing under `raw/{run_id}.parquet`

mod schema;
mod store;
mod writer;

pub use schema::batch_to_arrow;
pub use store::ObjectStoreSink;
pub use writer::{read_parquet_buffer, write_parquet_buffer, ParquetWriterConfig};
