//! Object-storage sink
//!
//! Lands the serialized batch under `raw/{run_id}.parquet` in a keyed
//! object store. The store client is constructed explicitly per run and
//! injected into the pipeline; there is no process-wide client state.

use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::info;

/// Fixed key prefix for landed objects
const RAW_PREFIX: &str = "raw";

/// Storage destination for serialized forecast batches
#[derive(Debug, Clone)]
pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    scheme: String,
}

impl ObjectStoreSink {
    /// Parse a destination URL and create the matching object store.
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3 (credentials and region from environment)
    /// - `/local/path/` or `./path/` - local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url)
        } else {
            Self::parse_local(url)
        }
    }

    fn parse_s3(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("s3://")
            .ok_or_else(|| Error::config(format!("Invalid s3 URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Wrap an already-built store (test doubles, alternative backends).
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: impl Into<String>) -> Self {
        Self {
            store,
            prefix: String::new(),
            scheme: scheme.into(),
        }
    }

    /// Get the scheme (s3, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Object key for a run identifier: `raw/{run_id}.parquet`, under the
    /// destination prefix when one was given.
    pub fn object_key(&self, run_id: &str) -> String {
        if self.prefix.is_empty() {
            format!("{RAW_PREFIX}/{run_id}.parquet")
        } else {
            format!(
                "{}/{RAW_PREFIX}/{run_id}.parquet",
                self.prefix.trim_end_matches('/')
            )
        }
    }

    /// Put the serialized batch at `raw/{run_id}.parquet`.
    ///
    /// The transport either completes the whole buffer or fails before
    /// writing; there is no staged rename and no retry. Returns the full
    /// object path for logging.
    pub async fn put(&self, run_id: &str, data: Vec<u8>) -> Result<String> {
        let path = ObjectPath::from(self.object_key(run_id));
        let size = data.len();

        self.store.put(&path, Bytes::from(data).into()).await?;

        let full_path = format!("{}://{path}", self.scheme);
        info!(path = %full_path, bytes = size, "wrote batch object");
        Ok(full_path)
    }
}
