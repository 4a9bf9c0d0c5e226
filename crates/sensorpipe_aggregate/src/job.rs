use crate::aggregate::{HourlyAggregate, HourlyAggregator};
use crate::error::JobError;
use crate::normalize::SensorReading;
use crate::output::{encode_csv, format_double};
use crate::schema::InputSchema;

use bytes::Bytes;
use csv::ReaderBuilder;
use sensorpipe_core::constants::{env, layout};
use sensorpipe_core::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

const PREVIEW_ROWS: usize = 20;

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameters {
    pub input_path: StorageUri,
    pub output_path: StorageUri,
}

impl JobParameters {
    pub fn new(input_path: StorageUri, output_path: StorageUri) -> Self {
        Self {
            input_path,
            output_path,
        }
    }

    /// Reads `INPUT_PATH` and `OUTPUT_PATH` from any key-value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigurationError::Missing(name))
        };

        Ok(Self {
            input_path: StorageUri::parse(get(env::INPUT_PATH)?.trim())?,
            output_path: StorageUri::parse_output(get(env::OUTPUT_PATH)?.trim())?,
        })
    }

    /// Reads the parameters from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the parameters a submitter placed in a job specification.
    pub fn from_runtime_parameters(
        params: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| params.get(name).cloned())
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub rows_read: usize,
    /// Rows whose timestamp could not be bucketed into an hour.
    pub rows_unassigned: usize,
    /// Measurement fields that normalized to a missing value.
    pub missing_values: usize,
    pub groups_written: usize,
    /// The single artifact holding the result.
    pub artifact: StorageUri,
}

/// Full-dataset recompute of hourly, per-location averages.
#[derive(Clone, Debug)]
pub struct AggregationJob<S> {
    storage: S,
}

impl<S: StorageBackend> AggregationJob<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[instrument(skip(self), fields(input = %params.input_path, output = %params.output_path))]
    pub async fn run(&self, params: &JobParameters) -> Result<JobReport, JobError> {
        let raw = self
            .storage
            .read(&params.input_path)
            .await
            .map_err(|e| JobError::InputNotFound(format!("{}: {e}", params.input_path)))?;

        let (groups, stats) = aggregate_csv(&raw)?;
        if stats.rows_unassigned > 0 {
            warn!(
                rows = stats.rows_unassigned,
                "rows with unparsable measurement_time were excluded"
            );
        }
        log_preview(&groups);

        let artifact = self.write(&params.output_path, encode_csv(&groups)?).await?;

        let report = JobReport {
            rows_read: stats.rows_read,
            rows_unassigned: stats.rows_unassigned,
            missing_values: stats.missing_values,
            groups_written: groups.len(),
            artifact,
        };
        info!(
            rows_read = report.rows_read,
            groups = report.groups_written,
            artifact = %report.artifact,
            "output written"
        );
        Ok(report)
    }

    /// Replaces whatever is at `output` with a single artifact.
    ///
    /// A prefix output (`…/`) is a dataset directory: it is cleared first, then holds
    /// one part file and a success marker.
    async fn write(&self, output: &StorageUri, data: Bytes) -> Result<StorageUri, JobError> {
        if output.is_bucket_root() {
            return Err(StorageError::InvalidRequest(format!(
                "refusing to replace bucket root {output}"
            ))
            .into());
        }

        if !output.is_prefix() {
            self.storage.write(output, data).await?;
            return Ok(output.clone());
        }

        self.storage.delete_prefix(output).await?;
        let part = output.join(layout::PART_FILE);
        self.storage.write(&part, data).await?;
        self.storage
            .write(&output.join(layout::SUCCESS_MARKER), Bytes::new())
            .await?;
        Ok(part)
    }
}

#[derive(Debug, Default)]
struct ReadStats {
    rows_read: usize,
    rows_unassigned: usize,
    missing_values: usize,
}

/// Read, normalize, derive and aggregate a CSV document.
fn aggregate_csv(raw: &[u8]) -> Result<(Vec<HourlyAggregate>, ReadStats), JobError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let schema = InputSchema::from_header(reader.headers()?)?;
    let mut aggregator = HourlyAggregator::new();
    let mut stats = ReadStats::default();

    for record in reader.records() {
        let reading = SensorReading::from_record(&record?, &schema);
        stats.rows_read += 1;
        stats.missing_values += reading.missing_values();
        aggregator.push(&reading);
    }

    stats.rows_unassigned = aggregator.unassigned();
    Ok((aggregator.finish(), stats))
}

fn log_preview(groups: &[HourlyAggregate]) {
    let fmt = |v: Option<f64>| v.map(format_double).unwrap_or_else(|| "null".to_string());
    for g in groups.iter().take(PREVIEW_ROWS) {
        info!(
            location = %g.location,
            hour = g.hour,
            avg_temperature_c = %fmt(g.avg_temperature_c),
            avg_co2_ppm = %fmt(g.avg_co2_ppm),
            "aggregate"
        );
    }
    if groups.len() > PREVIEW_ROWS {
        info!(
            remaining = groups.len() - PREVIEW_ROWS,
            "only showing top {PREVIEW_ROWS} rows"
        );
    }
}
