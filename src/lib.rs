//! Write metrics into SQL databases through user-supplied statement templates
//!
//! Each configured query is a SQL template with `:name` placeholders. For
//! every metric the placeholders are filled from the metric name
//! (`:metric`), its timestamp (`:timestamp`), configured defaults, tags and
//! fields, and the statement is executed as a parameterized query.

pub mod actors;
pub mod config;
pub mod datatype;
pub mod dialect;
pub mod error;
pub mod metric;
pub mod output;
pub mod quote;
pub mod resolver;
pub mod sql;
pub mod template;
pub mod util;
pub mod value;

pub use dialect::{Dialect, ExecutionStrategy};
pub use error::{OutputError, OutputResult};
pub use metric::{FieldValue, Metric, Record};
pub use output::SqlOutput;
pub use resolver::{ValueMap, resolve};
pub use template::{CompiledStatement, Template, compile};
pub use value::{Value, ValueKind};
