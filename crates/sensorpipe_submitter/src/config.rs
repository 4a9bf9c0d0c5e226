use sensorpipe_core::constants::DEFAULT_EXECUTOR_MEMORY;
use sensorpipe_core::prelude::*;

use std::collections::BTreeMap;

/// The constants a submitter is built from.
///
/// Supplied by the environment the submitter is deployed into (the CLI reads them
/// from flags or `EMR_APP_ID`, `EMR_EXEC_ROLE`, `INPUT_PATH`, `OUTPUT_PATH`).
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitterConfig {
    /// The compute application jobs are submitted to.
    pub application_id: String,
    /// The role job runs execute as.
    pub execution_role_arn: String,
    /// Source dataset, `scheme://bucket/key`.
    pub input_path: String,
    /// Destination dataset, `scheme://bucket/key`.
    pub output_path: String,
    /// Engine settings passed with every run.
    ///
    /// Defaults to `spark.executor.memory = 2G`.
    pub engine_conf: BTreeMap<String, String>,
}

impl SubmitterConfig {
    pub fn new(
        application_id: impl Into<String>,
        execution_role_arn: impl Into<String>,
        input_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            execution_role_arn: execution_role_arn.into(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            engine_conf: BTreeMap::from([(
                "spark.executor.memory".to_string(),
                DEFAULT_EXECUTOR_MEMORY.to_string(),
            )]),
        }
    }

    pub fn with_engine_conf(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.engine_conf.insert(key.into(), value.into());
        self
    }

    /// Checks every required constant is present and both paths are well-formed.
    pub fn validate(&self) -> Result<ResolvedConfig, ConfigurationError> {
        let application_id = required("application_id", &self.application_id)?;
        let execution_role_arn = required("execution_role_arn", &self.execution_role_arn)?;
        let input_path = StorageUri::parse(required("input_path", &self.input_path)?)?;
        let output_path = StorageUri::parse_output(required("output_path", &self.output_path)?)?;

        Ok(ResolvedConfig {
            application_id: application_id.to_string(),
            execution_role_arn: execution_role_arn.to_string(),
            input_path,
            output_path,
            engine_conf: self.engine_conf.clone(),
        })
    }
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ConfigurationError> {
    match value.trim() {
        "" => Err(ConfigurationError::Missing(name)),
        v => Ok(v),
    }
}

/// A [`SubmitterConfig`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub application_id: String,
    pub execution_role_arn: String,
    pub input_path: StorageUri,
    pub output_path: StorageUri,
    pub engine_conf: BTreeMap<String, String>,
}
