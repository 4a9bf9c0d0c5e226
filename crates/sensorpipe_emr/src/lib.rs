//! # Sensorpipe EMR Serverless
//!
//! An [`ExecutionService`] that starts job runs on an EMR Serverless application.
//!
//! Every run is a `sparkSubmit` job: the entry point from the specification, no arguments,
//! the engine settings as `--conf` pairs, and each runtime parameter exported to both the
//! driver and executor environments. Logs go to the specification's `log_uri`.
//!
//! ## Usage
//!
//! ```no_run
//! # use sensorpipe_emr::EmrServerlessBackend;
//! # async fn run() {
//! let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//! let backend = EmrServerlessBackend::new(&config).with_application("00fabc123");
//! # }
//! ```

use aws_sdk_emrserverless::Client as EmrClient;
use aws_sdk_emrserverless::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_emrserverless::operation::start_job_run::StartJobRunError;
use aws_sdk_emrserverless::types::{
    ConfigurationOverrides, JobDriver, MonitoringConfiguration, S3MonitoringConfiguration,
    SparkSubmit,
};
use sensorpipe_core::prelude::*;
use tracing::{debug, info};

const INTERNAL_SERVER_ERROR: &str = "InternalServerException";

#[derive(Clone, Debug)]
pub struct EmrServerlessBackend {
    client: EmrClient,
    application_id: Option<String>,
}

impl EmrServerlessBackend {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: EmrClient::new(config),
            application_id: None,
        }
    }

    /// The application checked by [`ExecutionService::init`].
    pub fn with_application(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }
}

/// Renders the `sparkSubmitParameters` string of a specification.
///
/// Engine settings come first, then every runtime parameter twice: once for the
/// driver environment, once for the executor environment.
pub fn spark_submit_parameters(job: &JobSpecification) -> String {
    let mut conf: Vec<String> = job
        .engine_conf
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();

    for role in ProcessRole::ALL {
        let prefix = match role {
            ProcessRole::Driver => "spark.emr-serverless.driverEnv",
            ProcessRole::Executor => "spark.emr-serverless.executorEnv",
        };
        conf.extend(
            job.environment(role)
                .iter()
                .map(|(k, v)| format!("{prefix}.{k}={v}")),
        );
    }

    conf.iter()
        .map(|c| format!("--conf {c}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Server-side failures are `System`, anything else the service answered is `Rejected`.
/// Failures before a response arrived (dispatch, timeout, construction) are `System`.
fn classify(err: SdkError<StartJobRunError>) -> SubmissionError {
    match &err {
        SdkError::ServiceError(context) => {
            let message = DisplayErrorContext(context.err()).to_string();
            if context.err().code() == Some(INTERNAL_SERVER_ERROR)
                || context.raw().status().is_server_error()
            {
                SubmissionError::System(message)
            } else {
                SubmissionError::Rejected(message)
            }
        }
        _ => SubmissionError::System(DisplayErrorContext(&err).to_string()),
    }
}

impl ExecutionService for EmrServerlessBackend {
    async fn init(&self) -> Result<(), SubmissionError> {
        let Some(application_id) = &self.application_id else {
            return Ok(());
        };

        let resp = self
            .client
            .get_application()
            .application_id(application_id)
            .send()
            .await
            .map_err(|e| SubmissionError::System(DisplayErrorContext(&e).to_string()))?;

        if let Some(app) = resp.application() {
            info!(application_id, state = ?app.state(), "EMR Serverless application found");
        }
        Ok(())
    }

    async fn start_job_run(&self, req: JobRunRequest) -> Result<JobRun, SubmissionError> {
        let params = spark_submit_parameters(&req.job);
        debug!(spark_submit_parameters = %params, "rendered job driver");

        let spark = SparkSubmit::builder()
            .entry_point(&req.job.entry_point)
            .set_entry_point_arguments(Some(Vec::new()))
            .spark_submit_parameters(params)
            .build()
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;

        let monitoring = MonitoringConfiguration::builder()
            .s3_monitoring_configuration(
                S3MonitoringConfiguration::builder()
                    .log_uri(&req.job.log_uri)
                    .build(),
            )
            .build();

        self.client
            .start_job_run()
            .application_id(&req.application_id)
            .execution_role_arn(&req.execution_role_arn)
            .name(&req.name)
            .client_token(&req.name)
            .job_driver(JobDriver::SparkSubmit(spark))
            .configuration_overrides(
                ConfigurationOverrides::builder()
                    .monitoring_configuration(monitoring)
                    .build(),
            )
            .send()
            .await
            .map(|output| JobRun {
                job_run_id: output.job_run_id().to_string(),
                application_id: output.application_id().to_string(),
            })
            .map_err(classify)
    }
}
