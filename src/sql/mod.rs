//! Database access for compiled statements
//!
//! ## Design
//!
//! - **Trait-based**: [`Connection`] and [`Transaction`] hide the driver, so
//!   dialects without a bundled driver can be plugged in by the host
//! - **Explicit registration**: a [`DriverRegistry`] maps each dialect to a
//!   [`Driver`]; nothing is registered implicitly
//! - **Strategies**: a [`StatementExecutor`] decides whether a statement is
//!   executed directly or inside a transaction
//!
//! ## Usage
//!
//! ```no_run
//! use template_sql::sql::{DriverRegistry, any::SqlxDriver};
//! use template_sql::{Dialect, config::PoolSettings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut registry = DriverRegistry::new();
//! SqlxDriver::register_all(&mut registry);
//!
//! let driver = registry.get(Dialect::Sqlite)?;
//! let connection = driver.open("sqlite://metrics.db?mode=rwc", &PoolSettings::default()).await?;
//! connection.ping().await?;
//! # Ok(())
//! # }
//! ```

pub mod any;
pub mod connection;
pub mod executor;
pub mod registry;

pub use connection::{Connection, Transaction};
pub use executor::{DirectExecutor, StatementExecutor, TransactionalExecutor};
pub use registry::{Driver, DriverRegistry};
