use crate::error::JobError;
use crate::job::{AggregationJob, JobParameters, JobReport};

use sensorpipe_core::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

type RunHandle = JoinHandle<Result<JobReport, JobError>>;

/// An [`ExecutionService`] that runs the aggregation job in-process.
///
/// The job sees nothing but the runtime parameters of the specification,
/// exactly as it would on a remote backend. Each run starts on its own task
/// and [`start_job_run`](ExecutionService::start_job_run) returns immediately.
#[derive(Clone)]
pub struct LocalExecutionService<S> {
    job: AggregationJob<S>,
    application_id: String,
    runs: Arc<Mutex<HashMap<String, RunHandle>>>,
}

impl<S: StorageBackend> LocalExecutionService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            job: AggregationJob::new(storage),
            application_id: "local".to_string(),
            runs: Arc::default(),
        }
    }

    /// Waits for a run to finish. `None` if the id is unknown or was already awaited.
    pub async fn wait(&self, job_run_id: &str) -> Option<Result<JobReport, JobError>> {
        let handle = self.runs.lock().await.remove(job_run_id)?;
        match handle.await {
            Ok(result) => Some(result),
            Err(e) => {
                error!(job_run_id, error = %e, "local job run panicked or was cancelled");
                None
            }
        }
    }
}

impl<S: StorageBackend> ExecutionService for LocalExecutionService<S> {
    async fn start_job_run(&self, req: JobRunRequest) -> Result<JobRun, SubmissionError> {
        let params = JobParameters::from_runtime_parameters(&req.job.runtime_parameters)
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;

        let job_run_id = Uuid::new_v4().to_string();
        let job = self.job.clone();
        let run_id = job_run_id.clone();

        let handle = tokio::spawn(async move {
            let result = job.run(&params).await;
            match &result {
                Ok(report) => info!(job_run_id = %run_id, artifact = %report.artifact, "local job run succeeded"),
                Err(e) => error!(job_run_id = %run_id, error = %e, "local job run failed"),
            }
            result
        });

        self.runs.lock().await.insert(job_run_id.clone(), handle);

        Ok(JobRun {
            job_run_id,
            application_id: self.application_id.clone(),
        })
    }
}
