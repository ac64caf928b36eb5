//! Helper functions for integration tests
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use template_sql::{
    Dialect, FieldValue, Metric, SqlOutput,
    config::OutputConfig,
    sql::{DriverRegistry, any::SqlxDriver},
};
use tempfile::TempDir;

pub const CREATE_CPU_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS cpu (ts TEXT, host TEXT, usage REAL, cores INTEGER)";

pub const INSERT_CPU: &str =
    "INSERT INTO cpu (ts, host, usage, cores) VALUES (:timestamp, :host, :usage, :cores)";

pub fn sqlite_dsn(dir: &TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("metrics.db").display())
}

pub fn sqlite_config(dir: &TempDir, queries: &[&str]) -> OutputConfig {
    let mut config = OutputConfig::new(
        Dialect::Sqlite,
        sqlite_dsn(dir),
        queries.iter().map(|q| q.to_string()).collect(),
    );
    config.init_sql = CREATE_CPU_TABLE.to_string();
    config.connection_max_open = 1;
    config
}

pub fn sqlx_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    SqlxDriver::register_all(&mut registry);
    registry
}

pub async fn connected_output(config: OutputConfig) -> SqlOutput {
    let mut output = SqlOutput::new(config).unwrap();
    output.connect(&sqlx_registry()).await.unwrap();
    output
}

pub fn cpu_metric(host: &str, usage: f64, timestamp: DateTime<Utc>) -> Metric {
    Metric::new("cpu", timestamp)
        .with_tag("host", host)
        .with_field("usage", FieldValue::Float(usage))
        .with_field("cores", FieldValue::Unsigned(8))
}

/// Read back `(host, usage)` rows from the cpu table, ordered by host
pub async fn read_cpu_rows(dir: &TempDir) -> Vec<(String, f64)> {
    SqlxDriver::install();
    let pool = sqlx::AnyPool::connect(&sqlite_dsn(dir)).await.unwrap();
    let rows = sqlx::query_as::<_, (String, f64)>("SELECT host, usage FROM cpu ORDER BY host")
        .fetch_all(&pool)
        .await
        .unwrap();
    pool.close().await;
    rows
}
