//! Templated SQL output
//!
//! [`SqlOutput`] ties the pieces together: for every metric it resolves the
//! value map once, compiles each configured template against it and hands
//! the statements to the dialect's execution strategy.
//!
//! ## Failure handling
//!
//! The first error aborts the write. Remaining templates of the metric and
//! remaining metrics of the batch are not attempted; statements that already
//! ran are not rolled back.

use tracing::{debug, info, instrument, trace};

use crate::config::OutputConfig;
use crate::error::{OutputError, OutputResult};
use crate::metric::Metric;
use crate::resolver::resolve;
use crate::sql::{Connection, DriverRegistry, StatementExecutor};
use crate::template::{CompiledStatement, Template};
use crate::value::Value;

pub struct SqlOutput {
    config: OutputConfig,
    templates: Vec<Template>,
    executor: Box<dyn StatementExecutor>,
    connection: Option<Box<dyn Connection>>,
}

impl SqlOutput {
    pub fn new(config: OutputConfig) -> OutputResult<Self> {
        config.validate()?;

        let templates = config.queries.iter().map(Template::parse).collect();
        let strategy = config.driver.execution_strategy();
        debug!(
            "creating {} output with {} queries ({:?} execution)",
            config.driver,
            config.queries.len(),
            strategy
        );

        Ok(Self {
            executor: strategy.executor(),
            templates,
            config,
            connection: None,
        })
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the database through the driver registered for the dialect
    ///
    /// Pings the database and runs `init_sql` if one is configured.
    #[instrument(skip_all, fields(driver = %self.config.driver))]
    pub async fn connect(&mut self, registry: &DriverRegistry) -> OutputResult<()> {
        let driver = registry.get(self.config.driver)?;
        let connection = driver
            .open(&self.config.data_source_name, &self.config.pool_settings())
            .await?;

        connection.ping().await?;

        if !self.config.init_sql.is_empty() {
            debug!("running init sql");
            connection
                .execute(&self.config.init_sql, &[])
                .await
                .map_err(|e| OutputError::InitFailed(e.to_string()))?;
        }

        info!("connected to {} database", self.config.driver);
        self.connection = Some(connection);
        Ok(())
    }

    /// Use an already opened connection instead of [`SqlOutput::connect`]
    pub fn with_connection(mut self, connection: Box<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    pub async fn close(&mut self) -> OutputResult<()> {
        if let Some(connection) = self.connection.take() {
            info!("closing {} output", self.config.driver);
            connection.close().await;
        }
        Ok(())
    }

    /// Compile every configured template for `metric`
    pub fn compile_metric(&self, metric: &Metric) -> OutputResult<Vec<CompiledStatement>> {
        let values = resolve(metric, &self.config.default_values);
        self.templates
            .iter()
            .map(|template| template.compile(self.config.driver, &values))
            .collect()
    }

    #[instrument(skip_all, fields(metric = %metric.name))]
    pub async fn write_metric(&self, metric: &Metric) -> OutputResult<()> {
        let connection = self.connection.as_deref().ok_or(OutputError::NotConnected)?;
        let values = resolve(metric, &self.config.default_values);

        for template in &self.templates {
            let statement = template.compile(self.config.driver, &values)?;
            let affected = self.executor.execute(connection, &statement).await?;
            trace!("statement affected {affected} rows");
        }

        Ok(())
    }

    pub async fn write(&self, metrics: &[Metric]) -> OutputResult<()> {
        for metric in metrics {
            self.write_metric(metric).await?;
        }
        Ok(())
    }

    /// Column type for `value` according to the `[convert]` table
    pub fn derive_datatype(&self, value: &Value) -> String {
        self.config.convert.derive_datatype(value)
    }
}
