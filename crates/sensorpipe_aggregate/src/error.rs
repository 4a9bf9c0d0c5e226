use sensorpipe_core::error::{ConfigurationError, StorageError};
use thiserror::Error;

/// Failures that abort a job run.
#[derive(Error, Debug)]
pub enum JobError {
    /// `INPUT_PATH` / `OUTPUT_PATH` missing or malformed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The input dataset cannot be read.
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// A required column is absent from the header.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The input is not valid delimited text, or the output could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A malformed field on a single row. Recovered locally, never aborts a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unparsable timestamp '{0}'")]
    Timestamp(String),
}
