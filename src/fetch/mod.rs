//! Fetch module
//!
//! One HTTP GET against the forecast endpoint. No retry, no backoff; a
//! failed fetch terminates the run and the invoking scheduler decides
//! whether to try again.

mod client;

pub use client::{Fetcher, FetcherConfig};
