// Aggregation job tests: end-to-end runs over the filesystem backend

use sensorpipe_aggregate::{AggregationJob, JobError, JobParameters};
use sensorpipe_core::prelude::*;
use sensorpipe_fs::FileSystemStorage;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "location,measurement_time,temperature_c,humidity_pct,co2_ppm";
const OUTPUT_HEADER: &str = "location,hour,avg_temperature_c,avg_co2_ppm";

fn setup(rows: &[&str]) -> (TempDir, AggregationJob<FileSystemStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = format!("{HEADER}\n");
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    write_input(dir.path(), &csv);
    let job = AggregationJob::new(FileSystemStorage::new(dir.path()));
    (dir, job)
}

fn write_input(root: &Path, csv: &str) {
    std::fs::create_dir_all(root.join("in")).unwrap();
    std::fs::write(root.join("in/data.csv"), csv).unwrap();
}

fn params(output: &str) -> JobParameters {
    JobParameters::new(
        StorageUri::parse("s3://in/data.csv").unwrap(),
        StorageUri::parse(output).unwrap(),
    )
}

fn read_output_lines(root: &Path, rel: &str) -> Vec<String> {
    std::fs::read_to_string(root.join(rel))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn two_readings_in_one_hour_are_averaged() {
    let (dir, job) = setup(&[
        "A,2024-01-01T09:15:00,20.0,45,410",
        "A,2024-01-01T09:45:00,22.0,47,430",
    ]);

    let report = job.run(&params("s3://out/output/")).await.unwrap();

    assert_eq!(report.rows_read, 2);
    assert_eq!(report.groups_written, 1);
    assert_eq!(report.artifact.to_string(), "s3://out/output/part-00000.csv");
    assert_eq!(
        read_output_lines(dir.path(), "out/output/part-00000.csv"),
        vec![OUTPUT_HEADER, "A,9,21.0,420.0"]
    );
    assert!(dir.path().join("out/output/_SUCCESS").is_file());
}

#[tokio::test]
async fn blank_temperature_yields_missing_average() {
    let (dir, job) = setup(&["A,2024-01-01T09:15:00,,50,500"]);

    job.run(&params("s3://out/hourly.csv")).await.unwrap();

    assert_eq!(
        read_output_lines(dir.path(), "out/hourly.csv"),
        vec![OUTPUT_HEADER, "A,9,,500.0"]
    );
}

#[tokio::test]
async fn identical_readings_round_trip() {
    let rows = vec!["Greenhouse,2024-03-10T14:05:00,18.5,60,612"; 7];
    let (dir, job) = setup(&rows);

    let report = job.run(&params("s3://out/hourly.csv")).await.unwrap();

    assert_eq!(report.groups_written, 1);
    assert_eq!(
        read_output_lines(dir.path(), "out/hourly.csv"),
        vec![OUTPUT_HEADER, "Greenhouse,14,18.5,612.0"]
    );
}

#[tokio::test]
async fn header_only_input_writes_header_only_output() {
    let (dir, job) = setup(&[]);

    let report = job.run(&params("s3://out/output/")).await.unwrap();

    assert_eq!(report.rows_read, 0);
    assert_eq!(report.groups_written, 0);
    assert_eq!(
        read_output_lines(dir.path(), "out/output/part-00000.csv"),
        vec![OUTPUT_HEADER]
    );
}

#[tokio::test]
async fn malformed_rows_are_recovered_not_fatal() {
    let (dir, job) = setup(&[
        "A,2024-01-01T09:15:00,abc,45,410",
        "A,garbage,100.0,45,9999",
        "A,2024-01-01T09:30:00,20.0,,",
        "B,2024-01-01T23:59:59,-4.5,30,380",
    ]);

    let report = job.run(&params("s3://out/hourly.csv")).await.unwrap();

    assert_eq!(report.rows_read, 4);
    assert_eq!(report.rows_unassigned, 1);
    assert_eq!(
        read_output_lines(dir.path(), "out/hourly.csv"),
        vec![OUTPUT_HEADER, "A,9,20.0,410.0", "B,23,-4.5,380.0"]
    );
}

#[tokio::test]
async fn duplicate_rows_fold_into_one_group() {
    let (dir, job) = setup(&[
        "A,2024-01-01T09:00:00,10.0,1,100",
        "A,2024-01-01T09:00:00,10.0,1,100",
        "A,2024-01-02T09:59:00,16.0,1,400",
    ]);

    job.run(&params("s3://out/hourly.csv")).await.unwrap();

    assert_eq!(
        read_output_lines(dir.path(), "out/hourly.csv"),
        vec![OUTPUT_HEADER, "A,9,12.0,200.0"]
    );
}

#[tokio::test]
async fn missing_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    write_input(
        dir.path(),
        "location,temperature_c,humidity_pct,co2_ppm\nA,20,40,400\n",
    );
    let job = AggregationJob::new(FileSystemStorage::new(dir.path()));

    let err = job.run(&params("s3://out/output/")).await.unwrap_err();

    assert!(matches!(err, JobError::Schema(_)));
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn missing_input_is_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let job = AggregationJob::new(FileSystemStorage::new(dir.path()));

    let err = job.run(&params("s3://out/output/")).await.unwrap_err();

    assert!(matches!(err, JobError::InputNotFound(_)));
}

#[tokio::test]
async fn rerun_overwrites_previous_dataset() {
    let (dir, job) = setup(&["A,2024-01-01T09:15:00,20.0,45,410"]);
    let stale = dir.path().join("out/output/part-00003.csv");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "stale").unwrap();

    job.run(&params("s3://out/output/")).await.unwrap();
    write_input(dir.path(), &format!("{HEADER}\nB,2024-01-01T10:00:00,5.0,1,300\n"));
    job.run(&params("s3://out/output/")).await.unwrap();

    assert!(!stale.exists());
    let mut files: Vec<_> = std::fs::read_dir(dir.path().join("out/output"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["_SUCCESS", "part-00000.csv"]);
    assert_eq!(
        read_output_lines(dir.path(), "out/output/part-00000.csv"),
        vec![OUTPUT_HEADER, "B,10,5.0,300.0"]
    );
}

#[tokio::test]
async fn bucket_root_output_leaves_the_bucket_untouched() {
    let (dir, job) = setup(&["A,2024-01-01T09:15:00,20.0,45,410"]);
    std::fs::create_dir_all(dir.path().join("in/src")).unwrap();
    std::fs::write(dir.path().join("in/src/main"), "entry").unwrap();

    for output in ["s3://in", "s3://in/"] {
        let params = JobParameters::new(
            StorageUri::parse("s3://in/data.csv").unwrap(),
            StorageUri::parse(output).unwrap(),
        );
        let err = job.run(&params).await.unwrap_err();
        assert!(
            matches!(err, JobError::Storage(StorageError::InvalidRequest(_))),
            "{output}: {err}"
        );
    }

    assert!(dir.path().join("in/data.csv").is_file());
    assert!(dir.path().join("in/src/main").is_file());
}
