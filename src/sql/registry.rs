//! Driver registration
//!
//! Hosts decide which dialects they can talk to by registering a [`Driver`]
//! per dialect, usually once at startup:
//!
//! ```no_run
//! use template_sql::sql::{DriverRegistry, any::SqlxDriver};
//!
//! let mut registry = DriverRegistry::new();
//! SqlxDriver::register_all(&mut registry);
//! template_sql::sql::registry::install_global(registry).expect("installed once");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use super::connection::Connection;
use crate::config::PoolSettings;
use crate::dialect::Dialect;
use crate::error::{OutputError, OutputResult};

/// Factory that opens connections for a dialect
#[async_trait]
pub trait Driver: Send + Sync {
    async fn open(&self, dsn: &str, pool: &PoolSettings) -> OutputResult<Box<dyn Connection>>;
}

/// Maps dialects to the driver that serves them
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: HashMap<Dialect, Arc<dyn Driver>>,
}

static GLOBAL_REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `driver` for `dialect`, replacing any earlier registration
    pub fn register(&mut self, dialect: Dialect, driver: Arc<dyn Driver>) -> &mut Self {
        debug!("registering driver for {dialect}");
        self.drivers.insert(dialect, driver);
        self
    }

    pub fn get(&self, dialect: Dialect) -> OutputResult<Arc<dyn Driver>> {
        self.drivers
            .get(&dialect)
            .cloned()
            .ok_or(OutputError::DriverNotRegistered(dialect))
    }

    pub fn contains(&self, dialect: Dialect) -> bool {
        self.drivers.contains_key(&dialect)
    }

    /// Registered dialects, in declaration order
    pub fn dialects(&self) -> Vec<Dialect> {
        Dialect::ALL
            .into_iter()
            .filter(|d| self.drivers.contains_key(d))
            .collect()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("dialects", &self.dialects())
            .finish()
    }
}

/// Install the process-wide registry; only the first call succeeds
pub fn install_global(registry: DriverRegistry) -> OutputResult<()> {
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| OutputError::RegistryAlreadyInstalled)
}

/// The process-wide registry, if one has been installed
pub fn global() -> Option<&'static DriverRegistry> {
    GLOBAL_REGISTRY.get()
}
