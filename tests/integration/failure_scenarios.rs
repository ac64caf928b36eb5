//! Failure scenarios that need no database

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use template_sql::{
    Dialect, Metric, OutputError, OutputResult, SqlOutput, Value,
    config::{OutputConfig, PoolSettings},
    sql::{Connection, Driver, DriverRegistry, Transaction},
};

/// Driver for a dialect without a bundled implementation that refuses to connect
struct UnreachableDriver;

#[async_trait]
impl Driver for UnreachableDriver {
    async fn open(&self, dsn: &str, _pool: &PoolSettings) -> OutputResult<Box<dyn Connection>> {
        Err(OutputError::ConnectionFailed(format!("{dsn} unreachable")))
    }
}

/// Connection whose commit always fails
struct FailingCommit;

struct FailingCommitTx;

#[async_trait]
impl Connection for FailingCommit {
    async fn execute(&self, _sql: &str, _args: &[Value]) -> OutputResult<u64> {
        Ok(0)
    }

    async fn begin(&self) -> OutputResult<Box<dyn Transaction>> {
        Ok(Box::new(FailingCommitTx))
    }

    async fn ping(&self) -> OutputResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

#[async_trait]
impl Transaction for FailingCommitTx {
    async fn execute_prepared(&mut self, _sql: &str, _args: &[Value]) -> OutputResult<u64> {
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> OutputResult<()> {
        Err(OutputError::CommitFailed("replica read-only".to_string()))
    }
}

fn config(driver: Dialect) -> OutputConfig {
    OutputConfig::new(driver, "tcp://db:9000", vec!["INSERT INTO :metric VALUES (:timestamp)".to_string()])
}

#[tokio::test]
async fn test_connection_failure_surfaces() {
    let mut registry = DriverRegistry::new();
    registry.register(Dialect::ClickHouse, Arc::new(UnreachableDriver));

    let mut output = SqlOutput::new(config(Dialect::ClickHouse)).unwrap();
    let result = output.connect(&registry).await;

    assert!(matches!(result, Err(OutputError::ConnectionFailed(msg)) if msg.contains("unreachable")));
    assert!(!output.is_connected());
}

#[tokio::test]
async fn test_commit_failure_names_phase() {
    let output = SqlOutput::new(config(Dialect::ClickHouse))
        .unwrap()
        .with_connection(Box::new(FailingCommit));

    let err = output
        .write_metric(&Metric::new("cpu", Utc::now()))
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::CommitFailed(_)));
    assert!(err.to_string().starts_with("commit failed"));
}

#[tokio::test]
async fn test_direct_dialect_skips_transaction() {
    // FailingCommit only fails inside transactions
    let output = SqlOutput::new(config(Dialect::SqlServer))
        .unwrap()
        .with_connection(Box::new(FailingCommit));

    output
        .write_metric(&Metric::new("cpu", Utc::now()))
        .await
        .unwrap();
}
