//! Writer actor driving a real SQLite output

use std::time::Duration;

use chrono::Utc;
use template_sql::actors::output::OutputHandle;
use tempfile::tempdir;

use crate::helpers::{INSERT_CPU, connected_output, cpu_metric, read_cpu_rows, sqlite_config};

#[tokio::test]
async fn test_actor_flushes_to_database() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;
    let handle = OutputHandle::spawn(output, 100, Duration::from_secs(3600));

    let now = Utc::now();
    handle
        .write(vec![cpu_metric("a", 1.0, now), cpu_metric("b", 2.0, now)])
        .await
        .unwrap();
    handle.flush().await.unwrap();

    let stats = handle.get_stats().await.unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(stats.failed_batches, 0);

    handle.shutdown().await;

    assert_eq!(read_cpu_rows(&dir).await.len(), 2);
}

#[tokio::test]
async fn test_shutdown_writes_pending_metrics() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;
    let handle = OutputHandle::spawn_configured(output);

    handle
        .write(vec![cpu_metric("a", 1.0, Utc::now())])
        .await
        .unwrap();
    handle.shutdown().await;

    assert_eq!(read_cpu_rows(&dir).await, vec![("a".to_string(), 1.0)]);
}

#[tokio::test]
async fn test_concurrent_producers() {
    let dir = tempdir().unwrap();
    let output = connected_output(sqlite_config(&dir, &[INSERT_CPU])).await;
    let handle = OutputHandle::spawn(output, 10, Duration::from_secs(3600));

    let mut tasks = Vec::new();
    for producer in 0..4 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..5 {
                let host = format!("p{producer}-{i}");
                handle
                    .write(vec![cpu_metric(&host, i as f64, Utc::now())])
                    .await
                    .unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    handle.shutdown().await;

    assert_eq!(read_cpu_rows(&dir).await.len(), 20);
}
