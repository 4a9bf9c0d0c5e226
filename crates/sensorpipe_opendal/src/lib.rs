//! # Sensorpipe OpenDAL Storage
//!
//! A storage backend powered by [Apache OpenDAL](https://opendal.apache.org/).
//!
//! A location `scheme://bucket/key` is served by the [`Operator`] registered for `bucket`,
//! so input and output may live in different buckets (or different services).
//!
//! ## Usage
//!
//! ```no_run
//! # use sensorpipe_opendal::OpendalStorage;
//! # fn run() -> Result<(), sensorpipe_core::error::StorageError> {
//! // Region and credentials come from the usual AWS environment variables.
//! let storage = OpendalStorage::s3(["sensor-input", "sensor-output"])?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use opendal::Operator;
use sensorpipe_core::prelude::*;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Default)]
pub struct OpendalStorage {
    operators: HashMap<String, Operator>,
}

impl OpendalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the Operator serving `bucket`.
    /// The Operator can be configured for any supported backend e.g., s3, fs, gcs, etc.
    pub fn with_operator(mut self, bucket: impl Into<String>, op: Operator) -> Self {
        self.operators.insert(bucket.into(), op);
        self
    }

    /// Builds one S3 Operator per bucket.
    pub fn s3<'a>(buckets: impl IntoIterator<Item = &'a str>) -> Result<Self, StorageError> {
        let mut storage = Self::new();
        for bucket in buckets {
            if storage.operators.contains_key(bucket) {
                continue;
            }
            let builder = opendal::services::S3::default().bucket(bucket);
            let op = Operator::new(builder)
                .map_err(|e| StorageError::System(format!("OpenDAL init error: {e}")))?
                .finish();
            storage = storage.with_operator(bucket, op);
        }
        Ok(storage)
    }

    fn operator(&self, uri: &StorageUri) -> Result<&Operator, StorageError> {
        self.operators.get(uri.bucket()).ok_or_else(|| {
            StorageError::InvalidRequest(format!(
                "No operator configured for bucket '{}'",
                uri.bucket()
            ))
        })
    }
}

impl StorageBackend for OpendalStorage {
    async fn read(&self, uri: &StorageUri) -> Result<Bytes, StorageError> {
        match self.operator(uri)?.read(uri.key()).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => {
                Err(StorageError::NotFound(uri.to_string()))
            }
            Err(e) => Err(StorageError::System(e.to_string())),
        }
    }

    async fn write(&self, uri: &StorageUri, data: Bytes) -> Result<(), StorageError> {
        self.operator(uri)?
            .write(uri.key(), data)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::System(format!("OpenDAL write error: {e}")))
    }

    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError> {
        let op = self.operator(uri)?;

        if !uri.is_prefix() {
            return op
                .delete(uri.key())
                .await
                .map_err(|e| StorageError::System(format!("OpenDAL delete error: {e}")));
        }

        let entries = match op.list_with(uri.key()).recursive(true).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::System(format!("OpenDAL list error: {e}"))),
        };

        for entry in entries.iter().filter(|e| e.metadata().is_file()) {
            debug!(path = entry.path(), "removing stale object");
            op.delete(entry.path())
                .await
                .map_err(|e| StorageError::System(format!("OpenDAL delete error: {e}")))?;
        }

        Ok(())
    }
}
