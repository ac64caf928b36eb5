use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, trace};

use crate::datatype::ConvertConfig;
use crate::dialect::Dialect;
use crate::error::{OutputError, OutputResult};
use crate::metric::FieldValue;
use crate::util::get_dsn_override;

/// Output configuration
///
/// Durations are whole seconds; `0` means "no limit".
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OutputConfig {
    /// Driver/dialect name (`pgx`, `mysql`, `sqlite`, `clickhouse`, `mssql`, `snowflake`)
    pub driver: Dialect,

    /// Connection string handed to the driver
    pub data_source_name: String,

    /// Statement executed once after connecting
    #[serde(default)]
    pub init_sql: String,

    /// Templates executed for every metric, in order
    pub queries: Vec<String>,

    /// Values available to every template, overridden by tags and fields
    #[serde(default)]
    pub default_values: HashMap<String, FieldValue>,

    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub connection_max_idle_time: u64,

    #[serde(default)]
    pub connection_max_lifetime: u64,

    #[serde(default = "default_max_idle")]
    pub connection_max_idle: u32,

    #[serde(default)]
    pub connection_max_open: u32,

    /// Writer flushes once this many metrics are buffered
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Writer flushes at least this often (seconds)
    #[serde(default = "default_flush_interval")]
    pub flush_interval: u64,
}

/// Connection pool limits derived from [`OutputConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_open: Option<u32>,
    pub min_idle: u32,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

fn default_max_idle() -> u32 {
    2
}

fn default_batch_size() -> usize {
    100
}

fn default_flush_interval() -> u64 {
    5
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl OutputConfig {
    pub fn new(driver: Dialect, data_source_name: impl Into<String>, queries: Vec<String>) -> Self {
        Self {
            driver,
            data_source_name: data_source_name.into(),
            init_sql: String::new(),
            queries,
            default_values: HashMap::new(),
            convert: ConvertConfig::default(),
            connection_max_idle_time: 0,
            connection_max_lifetime: 0,
            connection_max_idle: default_max_idle(),
            connection_max_open: 0,
            batch_size: default_batch_size(),
            flush_interval: default_flush_interval(),
        }
    }

    pub fn validate(&self) -> OutputResult<()> {
        if self.data_source_name.trim().is_empty() {
            return Err(OutputError::InvalidConfig(
                "data_source_name must not be empty".to_string(),
            ));
        }
        if self.queries.is_empty() {
            return Err(OutputError::InvalidConfig(
                "at least one query is required".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(OutputError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.flush_interval == 0 {
            return Err(OutputError::InvalidConfig(
                "flush_interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pool_settings(&self) -> PoolSettings {
        let max_open = (self.connection_max_open > 0).then_some(self.connection_max_open);
        let min_idle = match max_open {
            Some(max) => self.connection_max_idle.min(max),
            None => self.connection_max_idle,
        };

        PoolSettings {
            max_open,
            min_idle,
            idle_timeout: non_zero_secs(self.connection_max_idle_time),
            max_lifetime: non_zero_secs(self.connection_max_lifetime),
        }
    }
}

/// Load a config file; `.toml` files are parsed as TOML, anything else as JSON
///
/// `TEMPLATE_SQL_DSN` replaces the configured data source name before the
/// config is validated.
pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<OutputConfig> {
    load_config_file(path.as_ref(), get_dsn_override())
}

fn load_config_file(path: &Path, dsn_override: Option<String>) -> anyhow::Result<OutputConfig> {
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut config: OutputConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&file_content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?,
        _ => serde_json::from_str(&file_content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?,
    };

    if let Some(dsn) = dsn_override {
        debug!("using data source name from environment");
        config.data_source_name = dsn;
    }

    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
