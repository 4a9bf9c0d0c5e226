//! # Sensorpipe FileSystem Storage
//!
//! A local filesystem backend for sensorpipe.
//!
//! This crate implements the [`StorageBackend`] trait by mirroring the storage
//! namespace under a root directory: `scheme://bucket/key` lives at `<root>/bucket/key`.
//! The scheme is ignored, so `s3://` locations can be exercised offline.
//!
//! ## Features
//!
//! * **Atomic Writes**: Uses uniquely named temporary files and rename operations, so concurrent
//!   runs targeting the same output end with one complete artifact (last write wins).
//!
//! ## Usage
//!
//! ```no_run
//! use sensorpipe_fs::FileSystemStorage;
//!
//! let storage = FileSystemStorage::new("./sensorpipe_data");
//! ```

use bytes::Bytes;
use sensorpipe_core::prelude::*;
use std::path::{Path, PathBuf};
use tokio::fs;

async fn atomic_write(path: &Path, data: Bytes) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    fs::write(&tmp_path, data).await?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(StorageError::Io(e));
    }

    Ok(())
}

#[derive(Clone, Debug)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }

    fn get_path(&self, uri: &StorageUri) -> Result<PathBuf, StorageError> {
        let mut path = self.root.clone();
        let segments = std::iter::once(uri.bucket()).chain(uri.key().split('/'));
        for segment in segments.filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                return Err(StorageError::InvalidRequest(format!(
                    "Path traversal in {uri}"
                )));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl StorageBackend for FileSystemStorage {
    async fn read(&self, uri: &StorageUri) -> Result<Bytes, StorageError> {
        let path = self.get_path(uri)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(uri.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn write(&self, uri: &StorageUri, data: Bytes) -> Result<(), StorageError> {
        if uri.is_prefix() {
            return Err(StorageError::InvalidRequest(format!(
                "Cannot write an object to prefix {uri}"
            )));
        }
        atomic_write(&self.get_path(uri)?, data).await
    }

    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError> {
        let path = self.get_path(uri)?;
        let result = match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => detach_and_remove(&path).await,
            Ok(_) => fs::remove_file(&path).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Moves the directory out of the namespace before removing it, so writers that
/// arrive during removal start a fresh directory instead of racing `remove_dir_all`.
async fn detach_and_remove(path: &Path) -> std::io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let detached = path.with_file_name(format!(".{name}.{}.deleting", uuid::Uuid::new_v4()));

    fs::rename(path, &detached).await?;
    fs::remove_dir_all(&detached).await
}
