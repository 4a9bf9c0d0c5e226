use crate::config::{ResolvedConfig, SubmitterConfig};
use crate::policy::{BucketEntryPoint, EntryPointPolicy, derive_log_uri};

use chrono::{DateTime, Utc};
use sensorpipe_core::prelude::*;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A firing of the clock. Its occurrence is the only signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationEvent {
    pub fired_at: DateTime<Utc>,
}

impl ActivationEvent {
    pub fn now() -> Self {
        Self {
            fired_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Turns an activation into exactly one job run on an [`ExecutionService`].
///
/// Holds no state between activations; two activations are two runs.
#[derive(Clone)]
pub struct Submitter<E, P = BucketEntryPoint> {
    config: ResolvedConfig,
    service: E,
    policy: P,
}

impl<E: ExecutionService> Submitter<E> {
    pub fn new(config: SubmitterConfig, service: E) -> Result<Self, ConfigurationError> {
        Ok(Self {
            config: config.validate()?,
            service,
            policy: BucketEntryPoint::default(),
        })
    }
}

impl<E: ExecutionService, P: EntryPointPolicy> Submitter<E, P> {
    /// Replaces the entry point policy.
    pub fn with_policy<Q: EntryPointPolicy>(self, policy: Q) -> Submitter<E, Q> {
        Submitter {
            config: self.config,
            service: self.service,
            policy,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn service(&self) -> &E {
        &self.service
    }

    pub fn build_specification(&self) -> JobSpecification {
        let ResolvedConfig {
            input_path,
            output_path,
            engine_conf,
            ..
        } = &self.config;

        JobSpecification::new(
            self.policy.derive_entry_point(input_path),
            input_path.clone(),
            output_path.clone(),
            derive_log_uri(output_path),
        )
        .with_engine_conf(engine_conf.clone())
    }

    pub fn build_request(&self, event: &ActivationEvent) -> JobRunRequest {
        JobRunRequest {
            application_id: self.config.application_id.clone(),
            execution_role_arn: self.config.execution_role_arn.clone(),
            name: format!(
                "sensorpipe-{}-{}",
                event.fired_at.format("%Y%m%dT%H%M%SZ"),
                Uuid::new_v4().simple()
            ),
            job: self.build_specification(),
        }
    }

    /// Submits one run and reports its identifier. Rejections are returned, not retried.
    #[instrument(skip(self), fields(application_id = %self.config.application_id))]
    pub async fn submit(&self, event: &ActivationEvent) -> Result<SubmitOutcome, SubmissionError> {
        let req = self.build_request(event);
        info!(
            name = %req.name,
            entry_point = %req.job.entry_point,
            input = %req.job.input_path,
            output = %req.job.output_path,
            "submitting job run"
        );

        match self.service.start_job_run(req).await {
            Ok(run) => {
                info!(job_run_id = %run.job_run_id, "job run started");
                Ok(SubmitOutcome::accepted(run))
            }
            Err(e) => {
                warn!(error = %e, "job submission failed");
                Err(e)
            }
        }
    }
}

/// Handles one activation from scratch: validate, submit, report.
pub async fn handle_activation<E: ExecutionService>(
    config: SubmitterConfig,
    service: E,
    event: ActivationEvent,
) -> Result<SubmitOutcome, TriggerError> {
    let submitter = Submitter::new(config, service)?;
    Ok(submitter.submit(&event).await?)
}
