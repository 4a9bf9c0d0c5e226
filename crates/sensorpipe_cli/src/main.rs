mod storage;

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use clap::{Args, Parser, Subcommand};
use sensorpipe_aggregate::{AggregationJob, JobParameters, LocalExecutionService};
use sensorpipe_core::constants::{DEFAULT_EXECUTOR_MEMORY, env, schedule};
use sensorpipe_core::prelude::*;
use sensorpipe_emr::EmrServerlessBackend;
use sensorpipe_fs::FileSystemStorage;
use sensorpipe_submitter::prelude::*;
use std::path::PathBuf;
use storage::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sensorpipe", version, about = "Hourly sensor aggregation pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one aggregation run to EMR Serverless and print the outcome as JSON
    Submit(SubmitArgs),

    /// Submit a run on every firing of a cron schedule until interrupted
    Schedule {
        #[command(flatten)]
        submit: SubmitArgs,

        /// Six-field cron expression, evaluated in UTC
        #[arg(long, default_value = schedule::DEFAULT_CRON)]
        cron: String,

        /// Run jobs in-process against a local mirror of the storage namespace instead of EMR
        #[arg(long)]
        local_root: Option<PathBuf>,
    },

    /// Run the aggregation job itself
    Aggregate {
        #[arg(long, env = env::INPUT_PATH)]
        input_path: Option<String>,

        #[arg(long, env = env::OUTPUT_PATH)]
        output_path: Option<String>,

        /// Read and write a local mirror of the storage namespace instead of S3
        #[arg(long)]
        local_root: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SubmitArgs {
    /// The EMR Serverless application id
    #[arg(long, env = env::APPLICATION_ID)]
    application_id: Option<String>,

    /// The execution role ARN job runs assume
    #[arg(long, env = env::EXECUTION_ROLE)]
    execution_role: Option<String>,

    /// Source dataset, e.g. s3://bucket/data.csv
    #[arg(long, env = env::INPUT_PATH)]
    input_path: Option<String>,

    /// Destination dataset, e.g. s3://bucket/output/
    #[arg(long, env = env::OUTPUT_PATH)]
    output_path: Option<String>,

    #[arg(long, default_value = DEFAULT_EXECUTOR_MEMORY)]
    executor_memory: String,
}

impl SubmitArgs {
    fn config(&self) -> SubmitterConfig {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        SubmitterConfig::new(
            value(&self.application_id),
            value(&self.execution_role),
            value(&self.input_path),
            value(&self.output_path),
        )
        .with_engine_conf("spark.executor.memory", &self.executor_memory)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Submit(args) => submit(args).await,
        Commands::Schedule {
            submit,
            cron,
            local_root,
        } => run_schedule(submit, &cron, local_root).await,
        Commands::Aggregate {
            input_path,
            output_path,
            local_root,
        } => aggregate(input_path, output_path, local_root).await,
    }
}

async fn emr_backend(application_id: &str) -> EmrServerlessBackend {
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    EmrServerlessBackend::new(&aws_config).with_application(application_id)
}

async fn submit(args: SubmitArgs) -> Result<()> {
    let config = args.config();
    let service = emr_backend(&config.application_id).await;

    let outcome = handle_activation(config, service, ActivationEvent::now()).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn run_schedule(args: SubmitArgs, cron: &str, local_root: Option<PathBuf>) -> Result<()> {
    let trigger = CronTrigger::new(cron)?;
    let config = args.config();

    match local_root {
        Some(root) => {
            let service = LocalExecutionService::new(FileSystemStorage::new(root));
            serve(trigger, Submitter::new(config, service)?).await
        }
        None => {
            let service = emr_backend(&config.application_id).await;
            serve(trigger, Submitter::new(config, service)?).await
        }
    }
}

async fn serve<E: ExecutionService>(trigger: CronTrigger, submitter: Submitter<E>) -> Result<()> {
    submitter
        .service()
        .init()
        .await
        .context("execution service unavailable")?;

    trigger
        .run(&submitter, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}

async fn aggregate(
    input_path: Option<String>,
    output_path: Option<String>,
    local_root: Option<PathBuf>,
) -> Result<()> {
    let params = JobParameters::from_lookup(|name| match name {
        env::INPUT_PATH => input_path.clone(),
        env::OUTPUT_PATH => output_path.clone(),
        _ => None,
    })?;

    let storage = Storage::select(local_root, &[&params.input_path, &params.output_path])?;
    let report = AggregationJob::new(storage).run(&params).await?;

    println!("Output written to {}", report.artifact);
    Ok(())
}
