//! sqlx-backed driver for PostgreSQL, MySQL and SQLite
//!
//! Uses sqlx's `Any` driver so a single implementation serves every
//! dialect sqlx ships. Which sqlx drivers are linked in is decided by the
//! `driver-*` cargo features; they are installed into sqlx on first use.
//!
//! ## Binding
//!
//! - signed integers, floats, strings and booleans bind natively
//! - unsigned integers bind as `BIGINT` when they fit, as decimal text otherwise
//! - timestamps bind as `YYYY-MM-DD HH:MM:SS.ffffff` text (UTC)

use std::sync::{Arc, Once};

use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyPoolOptions};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Executor as _, Statement as _};
use tracing::{debug, info, instrument, warn};

use super::connection::{Connection, Transaction};
use super::registry::{Driver, DriverRegistry};
use crate::config::PoolSettings;
use crate::dialect::Dialect;
use crate::error::{OutputError, OutputResult};
use crate::value::Value;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

static INSTALL_DRIVERS: Once = Once::new();

/// Dialects served by the linked-in sqlx drivers
pub const SUPPORTED_DIALECTS: &[Dialect] = &[
    #[cfg(feature = "driver-postgres")]
    Dialect::Postgres,
    #[cfg(feature = "driver-mysql")]
    Dialect::MySql,
    #[cfg(feature = "driver-sqlite")]
    Dialect::Sqlite,
];

/// [`Driver`] for every dialect sqlx can talk to
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxDriver;

impl SqlxDriver {
    /// Install the enabled sqlx drivers; safe to call repeatedly
    pub fn install() {
        INSTALL_DRIVERS.call_once(|| {
            let result = sqlx::any::install_drivers(&[
                #[cfg(feature = "driver-postgres")]
                sqlx::postgres::any::DRIVER,
                #[cfg(feature = "driver-mysql")]
                sqlx::mysql::any::DRIVER,
                #[cfg(feature = "driver-sqlite")]
                sqlx::sqlite::any::DRIVER,
            ]);
            if let Err(e) = result {
                warn!("sqlx drivers were already installed: {e}");
            }
        });
    }

    /// Register this driver for every supported dialect
    pub fn register_all(registry: &mut DriverRegistry) {
        Self::install();
        let driver = Arc::new(SqlxDriver);
        for dialect in SUPPORTED_DIALECTS {
            registry.register(*dialect, driver.clone());
        }
    }
}

#[async_trait]
impl Driver for SqlxDriver {
    #[instrument(skip_all)]
    async fn open(&self, dsn: &str, pool: &PoolSettings) -> OutputResult<Box<dyn Connection>> {
        Self::install();

        let mut options = AnyPoolOptions::new()
            .min_connections(pool.min_idle)
            .idle_timeout(pool.idle_timeout)
            .max_lifetime(pool.max_lifetime);
        if let Some(max) = pool.max_open {
            options = options.max_connections(max);
        }

        let pool = options
            .connect(dsn)
            .await
            .map_err(|e| OutputError::ConnectionFailed(e.to_string()))?;

        info!("sqlx connection pool created");
        Ok(Box::new(SqlxConnection { pool }))
    }
}

/// Pooled sqlx connection
pub struct SqlxConnection {
    pool: AnyPool,
}

struct SqlxTransaction {
    tx: sqlx::Transaction<'static, Any>,
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Int(v) => query.bind(*v),
        Value::Unsigned(v) => match i64::try_from(*v) {
            Ok(v) => query.bind(v),
            Err(_) => query.bind(v.to_string()),
        },
        Value::Float(v) => query.bind(*v),
        Value::String(v) => query.bind(v.clone()),
        Value::Bool(v) => query.bind(*v),
        Value::Timestamp(v) => query.bind(v.format(TIMESTAMP_FORMAT).to_string()),
    }
}

#[async_trait]
impl Connection for SqlxConnection {
    async fn execute(&self, sql: &str, args: &[Value]) -> OutputResult<u64> {
        let query = args
            .iter()
            .fold(sqlx::query(sql), |query, value| bind_value(query, value));

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| OutputError::ExecutionFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn begin(&self) -> OutputResult<Box<dyn Transaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| OutputError::BeginFailed(e.to_string()))?;

        Ok(Box::new(SqlxTransaction { tx }))
    }

    async fn ping(&self) -> OutputResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OutputError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) {
        debug!("closing sqlx connection pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl Transaction for SqlxTransaction {
    async fn execute_prepared(&mut self, sql: &str, args: &[Value]) -> OutputResult<u64> {
        let statement = (&mut *self.tx)
            .prepare(sql)
            .await
            .map_err(|e| OutputError::PrepareFailed(e.to_string()))?;

        let query = args
            .iter()
            .fold(statement.query(), |query, value| bind_value(query, value));

        let result = query
            .execute(&mut *self.tx)
            .await
            .map_err(|e| OutputError::ExecutionFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> OutputResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| OutputError::CommitFailed(e.to_string()))
    }
}
