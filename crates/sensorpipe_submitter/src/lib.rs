//! # Sensorpipe Submitter
//!
//! Translates a clock firing into one submission of the aggregation job.
//!
//! The [`Submitter`] derives everything a run needs from a small [`SubmitterConfig`]:
//!
//! * **Entry point**: `<input-bucket>/src/main`, via a pluggable [`EntryPointPolicy`].
//! * **Log location**: `<output-bucket>/logs/`.
//! * **Runtime parameters**: `INPUT_PATH` and `OUTPUT_PATH`, identical for driver and executors.
//!
//! Submissions are never deduplicated: every activation starts a new run, and later runs
//! overwrite the output of earlier ones.
//!
//! ## Example
//!
//! ```no_run
//! use sensorpipe_submitter::prelude::*;
//! # use sensorpipe_core::prelude::*;
//!
//! # async fn run<E: ExecutionService>(service: E) -> Result<(), TriggerError> {
//! let config = SubmitterConfig::new(
//!     "00fabc123",
//!     "arn:aws:iam::123456789012:role/emr-serverless",
//!     "s3://sensor-input/data.csv",
//!     "s3://sensor-output/output/",
//! );
//!
//! let outcome = handle_activation(config, service, ActivationEvent::now()).await?;
//! println!("started {}", outcome.job_run_id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod policy;
pub mod submitter;
pub mod trigger;

pub use config::*;
pub use policy::*;
pub use submitter::*;
pub use trigger::*;

pub mod prelude {
    pub use crate::config::{ResolvedConfig, SubmitterConfig};
    pub use crate::policy::{BucketEntryPoint, EntryPointPolicy, derive_entry_point, derive_log_uri};
    pub use crate::submitter::{ActivationEvent, Submitter, TriggerError, handle_activation};
    pub use crate::trigger::CronTrigger;
}
