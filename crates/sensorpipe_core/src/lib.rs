//! # Sensorpipe Core
//!
//! Types and traits shared by the submitter and the aggregation job.
//!
//! Defines the contract between the two halves of the pipeline:
//!
//! - **[`JobSpecification`](job::JobSpecification)**: Entry point, input/output locations and runtime parameters of one run.
//! - **[`ExecutionService`](traits::ExecutionService)**: Trait for implementing job-run backends (e.g., EMR Serverless, in-process).
//! - **[`StorageBackend`](traits::StorageBackend)**: Trait for implementing storage layers (e.g., S3, Filesystem).
//! - **[`StorageUri`](uri::StorageUri)**: `scheme://bucket/key` locations in the shared storage namespace.

pub mod constants;
pub mod error;
pub mod job;
pub mod traits;
pub mod uri;

pub mod prelude {
    pub use super::constants;
    pub use super::error::*;
    pub use super::job::*;
    pub use super::traits::*;
    pub use super::uri::*;
}
