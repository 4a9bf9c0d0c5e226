use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A required constant (application id, role, input or output path) is absent or blank.
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// A storage location is not of the form `scheme://bucket/key`.
    #[error("Invalid storage URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The trigger schedule could not be parsed.
    #[error("Invalid schedule '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    /// The execution service refused the request (validation, quota, unknown application).
    #[error("Job submission rejected: {0}")]
    Rejected(String),

    /// Transport or provider failure while talking to the execution service.
    #[error("Execution service failure: {0}")]
    System(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    /// Low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing is stored at the requested location.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The location cannot be served by this backend (e.g., unknown bucket).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Generic backend-specific failure (e.g., object store SDK error).
    #[error("Storage system failure: {0}")]
    System(String),
}
