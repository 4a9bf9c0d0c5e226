//! # Sensorpipe Aggregate
//!
//! The batch job: hourly, per-location averages over a raw sensor dataset.
//!
//! A run is a linear pipeline over one delimited dataset:
//!
//! 1. **Read** the CSV at `INPUT_PATH` (header row required).
//! 2. **Normalize** `temperature_c`, `humidity_pct`, `co2_ppm` to optional doubles.
//! 3. **Derive** the hour of day from `measurement_time`, as written.
//! 4. **Aggregate** by `(location, hour)`: mean temperature and mean CO2 over non-missing values.
//! 5. **Write** one consolidated CSV to `OUTPUT_PATH`, replacing any previous result.
//!
//! Bad fields never abort a run: unparsable numbers become missing values and rows with an
//! unparsable timestamp are left out of every group.
//!
//! ## Usage
//!
//! ```no_run
//! use sensorpipe_aggregate::{AggregationJob, JobParameters};
//! # async fn run<S: sensorpipe_core::traits::StorageBackend>(storage: S) -> Result<(), sensorpipe_aggregate::JobError> {
//! let params = JobParameters::from_env()?;
//! let report = AggregationJob::new(storage).run(&params).await?;
//! println!("{} groups written to {}", report.groups_written, report.artifact);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod error;
pub mod job;
pub mod local;
pub mod normalize;
pub mod output;
pub mod schema;

pub use aggregate::{HourlyAggregate, HourlyAggregator, aggregate};
pub use error::{JobError, ParseError};
pub use job::{AggregationJob, JobParameters, JobReport};
pub use local::LocalExecutionService;
pub use normalize::{SensorReading, parse_hour, parse_measurement};
pub use output::{encode_csv, format_double};
pub use schema::InputSchema;
