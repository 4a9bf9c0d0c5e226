use crate::error::*;
use crate::job::{JobRun, JobRunRequest};
use crate::uri::StorageUri;

use bytes::Bytes;

/// A trait for injecting the job-run backend into the submitter.
pub trait ExecutionService: Send + Sync + 'static + Clone {
    /// Optional: Verifies the backend is reachable and the target application exists.
    fn init(&self) -> impl Future<Output = Result<(), SubmissionError>> + Send {
        async { Ok(()) }
    }

    /// Starts exactly one job run. Never deduplicates.
    fn start_job_run(
        &self,
        req: JobRunRequest,
    ) -> impl Future<Output = Result<JobRun, SubmissionError>> + Send;
}

/// A trait for injecting storage logic into the aggregation job.
pub trait StorageBackend: Send + Sync + 'static + Clone {
    /// Reads the object at `uri`.
    fn read(&self, uri: &StorageUri) -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Writes the object at `uri`, replacing whatever was there.
    fn write(
        &self,
        uri: &StorageUri,
        data: Bytes,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes every object under the prefix `uri`. Removing nothing is not an error.
    fn delete_prefix(&self, uri: &StorageUri)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}
