use bytes::Bytes;
use sensorpipe_core::prelude::*;
use sensorpipe_fs::FileSystemStorage;
use sensorpipe_opendal::OpendalStorage;
use std::path::PathBuf;

/// The storage backend picked on the command line.
#[derive(Clone)]
pub enum Storage {
    Fs(FileSystemStorage),
    Opendal(OpendalStorage),
}

impl Storage {
    /// A local mirror under `root` if given, otherwise S3 for every bucket the run touches.
    pub fn select(local_root: Option<PathBuf>, uris: &[&StorageUri]) -> Result<Self, StorageError> {
        match local_root {
            Some(root) => Ok(Self::Fs(FileSystemStorage::new(root))),
            None => Ok(Self::Opendal(OpendalStorage::s3(
                uris.iter().map(|u| u.bucket()),
            )?)),
        }
    }
}

impl StorageBackend for Storage {
    async fn read(&self, uri: &StorageUri) -> Result<Bytes, StorageError> {
        match self {
            Self::Fs(s) => s.read(uri).await,
            Self::Opendal(s) => s.read(uri).await,
        }
    }

    async fn write(&self, uri: &StorageUri, data: Bytes) -> Result<(), StorageError> {
        match self {
            Self::Fs(s) => s.write(uri, data).await,
            Self::Opendal(s) => s.write(uri, data).await,
        }
    }

    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError> {
        match self {
            Self::Fs(s) => s.delete_prefix(uri).await,
            Self::Opendal(s) => s.delete_prefix(uri).await,
        }
    }
}
