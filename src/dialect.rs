//! SQL dialects
//!
//! A dialect decides two things: how a positional parameter marker is
//! rendered, and how a compiled statement is executed.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::OutputError;

/// Target SQL engine family, selected by the `driver` config key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    /// PostgreSQL via the `pgx` driver name
    Postgres,
    MySql,
    Sqlite,
    ClickHouse,
    SqlServer,
    Snowflake,
}

/// How a compiled statement is handed to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// A single parameterized execute call
    Direct,

    /// Begin, prepare, execute, commit
    Transactional,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::ClickHouse,
        Dialect::SqlServer,
        Dialect::Snowflake,
    ];

    /// The identifier used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "pgx",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::ClickHouse => "clickhouse",
            Dialect::SqlServer => "mssql",
            Dialect::Snowflake => "snowflake",
        }
    }

    /// Render the marker for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::MySql
            | Dialect::Sqlite
            | Dialect::ClickHouse
            | Dialect::SqlServer
            | Dialect::Snowflake => "?".to_string(),
        }
    }

    pub fn execution_strategy(&self) -> ExecutionStrategy {
        match self {
            // ClickHouse only accepts inserts through prepared batches
            Dialect::ClickHouse => ExecutionStrategy::Transactional,
            Dialect::Postgres
            | Dialect::MySql
            | Dialect::Sqlite
            | Dialect::SqlServer
            | Dialect::Snowflake => ExecutionStrategy::Direct,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pgx" | "postgres" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "clickhouse" => Ok(Dialect::ClickHouse),
            "mssql" | "sqlserver" => Ok(Dialect::SqlServer),
            "snowflake" => Ok(Dialect::Snowflake),
            other => Err(OutputError::UnknownDialect(other.to_string())),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = OutputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
