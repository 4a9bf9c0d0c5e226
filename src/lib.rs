//! # Sensorpipe
//!
//! A scheduled batch pipeline for sensor data: a clock fires a submitter, the submitter starts
//! one aggregation run on an execution service, and the run writes hourly, per-location
//! averages back to storage.
//!
//! This crate serves as an entry point, re-exporting the core types and
//! optionally including the submitter, the job, and backend implementations via feature flags.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | **`submitter`** | Trigger and job submitter (`sensorpipe_submitter`). Enabled by default. |
//! | **`aggregate`** | The aggregation job and the in-process execution service (`sensorpipe_aggregate`). Enabled by default. |
//! | **`fs`** | Storage backend for the local filesystem (`sensorpipe_fs`). |
//! | **`opendal`** | Storage backend for object stores via OpenDAL (`sensorpipe_opendal`). |
//! | **`emr`** | Execution backend for EMR Serverless (`sensorpipe_emr`). |
//!
//! ## Example: Local Pipeline
//!
//! ```toml
//! [dependencies]
//! sensorpipe = { version = "0.3", features = ["fs"] }
//! ```
//!
//! ```rust,ignore
//! use sensorpipe::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = FileSystemStorage::new("./sensorpipe_data");
//!     let service = LocalExecutionService::new(storage);
//!
//!     let config = SubmitterConfig::new(
//!         "local",
//!         "arn:aws:iam::000000000000:role/local",
//!         "s3://sensor-input/data.csv",
//!         "s3://sensor-output/output/",
//!     );
//!     let submitter = Submitter::new(config, service.clone())?;
//!
//!     // Fire
//!     let outcome = submitter.submit(&ActivationEvent::now()).await?;
//!
//!     // Wait for the in-process run
//!     if let Some(report) = service.wait(&outcome.job_run_id).await {
//!         println!("wrote {}", report?.artifact);
//!     }
//!     Ok(())
//! }
//! ```

pub use sensorpipe_core::*;

#[cfg(feature = "submitter")]
pub mod submitter {
    pub use sensorpipe_submitter::*;
}

#[cfg(feature = "aggregate")]
pub mod aggregate {
    pub use sensorpipe_aggregate::*;
}

#[cfg(feature = "fs")]
pub mod fs {
    pub use sensorpipe_fs::*;
}

#[cfg(feature = "opendal")]
pub mod opendal {
    pub use sensorpipe_opendal::*;
}

#[cfg(feature = "emr")]
pub mod emr {
    pub use sensorpipe_emr::*;
}

pub mod prelude {
    pub use sensorpipe_core::prelude::*;

    #[cfg(feature = "submitter")]
    pub use sensorpipe_submitter::prelude::*;

    #[cfg(feature = "aggregate")]
    pub use sensorpipe_aggregate::{AggregationJob, JobParameters, JobReport, LocalExecutionService};

    #[cfg(feature = "fs")]
    pub use sensorpipe_fs::FileSystemStorage;

    #[cfg(feature = "opendal")]
    pub use sensorpipe_opendal::OpendalStorage;

    #[cfg(feature = "emr")]
    pub use sensorpipe_emr::EmrServerlessBackend;
}
