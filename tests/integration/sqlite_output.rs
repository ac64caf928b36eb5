//! End-to-end writes through the sqlx driver into SQLite

use chrono::{Duration, Utc};
use template_sql::{FieldValue, Metric, OutputError};
use tempfile::tempdir;

use crate::helpers::{INSERT_CPU, connected_output, cpu_metric, read_cpu_rows, sqlite_config};

#[tokio::test]
async fn test_write_batch_persists_rows() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;

    let now = Utc::now();
    let metrics = vec![
        cpu_metric("a", 10.0, now),
        cpu_metric("b", 20.5, now + Duration::seconds(1)),
    ];
    output.write(&metrics).await.unwrap();

    let rows = read_cpu_rows(&dir).await;
    assert_eq!(rows, vec![("a".to_string(), 10.0), ("b".to_string(), 20.5)]);
}

#[tokio::test]
async fn test_init_sql_runs_on_connect() {
    let dir = tempdir().unwrap();
    let _output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;

    // Table created by init_sql, still empty
    assert!(read_cpu_rows(&dir).await.is_empty());
}

#[tokio::test]
async fn test_multiple_queries_per_metric() {
    let dir = tempdir().unwrap();
    let config = sqlite_config(
        &dir,
        &[
            INSERT_CPU,
            "UPDATE cpu SET usage = usage * 2 WHERE host = :host",
        ],
    );
    let output = connected_output(config).await;

    output
        .write_metric(&cpu_metric("a", 3.0, Utc::now()))
        .await
        .unwrap();

    assert_eq!(read_cpu_rows(&dir).await, vec![("a".to_string(), 6.0)]);
}

#[tokio::test]
async fn test_missing_value_aborts_batch() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;

    let incomplete = Metric::new("cpu", Utc::now())
        .with_tag("host", "b")
        .with_field("usage", FieldValue::Float(1.0));
    let metrics = vec![
        cpu_metric("a", 1.0, Utc::now()),
        incomplete,
        cpu_metric("c", 1.0, Utc::now()),
    ];

    let result = output.write(&metrics).await;

    assert!(matches!(result, Err(OutputError::MissingTemplateValue(key)) if key == "cores"));
    assert_eq!(read_cpu_rows(&dir).await, vec![("a".to_string(), 1.0)]);
}

#[tokio::test]
async fn test_sql_error_is_reported_as_execution_failure() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(
        &dir,
        &["INSERT INTO no_such_table VALUES (:host)"],
    ))
    .await;

    let result = output.write_metric(&cpu_metric("a", 1.0, Utc::now())).await;

    assert!(matches!(result, Err(OutputError::ExecutionFailed(_))));
}
