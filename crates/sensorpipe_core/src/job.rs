use crate::constants::env;
use crate::uri::StorageUri;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The declarative description of one aggregation run, handed to an [`ExecutionService`].
///
/// Built fresh for every activation and never persisted.
///
/// [`ExecutionService`]: crate::traits::ExecutionService
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSpecification {
    /// Location of the aggregation program.
    pub entry_point: String,
    pub input_path: StorageUri,
    pub output_path: StorageUri,
    /// Environment variables the job reads. Always contains `INPUT_PATH` and `OUTPUT_PATH`.
    pub runtime_parameters: BTreeMap<String, String>,
    /// Engine settings that are not environment variables (e.g., executor memory).
    pub engine_conf: BTreeMap<String, String>,
    /// Where the execution service writes the run's logs.
    pub log_uri: String,
}

impl JobSpecification {
    pub fn new(
        entry_point: impl Into<String>,
        input_path: StorageUri,
        output_path: StorageUri,
        log_uri: impl Into<String>,
    ) -> Self {
        let runtime_parameters = BTreeMap::from([
            (env::INPUT_PATH.to_string(), input_path.to_string()),
            (env::OUTPUT_PATH.to_string(), output_path.to_string()),
        ]);

        Self {
            entry_point: entry_point.into(),
            input_path,
            output_path,
            runtime_parameters,
            engine_conf: BTreeMap::new(),
            log_uri: log_uri.into(),
        }
    }

    pub fn with_engine_conf<K, V>(mut self, conf: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.engine_conf
            .extend(conf.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The environment seen by a process of the given role.
    ///
    /// Driver and executor share the same parameters.
    pub fn environment(&self, _role: ProcessRole) -> &BTreeMap<String, String> {
        &self.runtime_parameters
    }
}

/// The process roles of a distributed job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessRole {
    Driver,
    Executor,
}

impl ProcessRole {
    pub const ALL: [ProcessRole; 2] = [ProcessRole::Driver, ProcessRole::Executor];
}

/// A request to start a job run on an [`ExecutionService`].
///
/// [`ExecutionService`]: crate::traits::ExecutionService
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRunRequest {
    /// The compute application the run belongs to.
    pub application_id: String,
    /// Role the run assumes while executing.
    pub execution_role_arn: String,
    /// Unique per submission. Also used as the idempotency token, so no two
    /// submissions are ever collapsed into one run.
    pub name: String,
    pub job: JobSpecification,
}

/// The result of a submission, owned by the execution service from then on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRun {
    pub job_run_id: String,
    pub application_id: String,
}

/// What the submitter reports back to whoever fired it.
///
/// `status_code` only says the submission was accepted, not that the run succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub status_code: u16,
    pub job_run_id: String,
    pub application_id: String,
}

impl SubmitOutcome {
    pub const ACCEPTED: u16 = 200;

    pub fn accepted(run: JobRun) -> Self {
        Self {
            status_code: Self::ACCEPTED,
            job_run_id: run.job_run_id,
            application_id: run.application_id,
        }
    }
}
