//! Template compilation
//!
//! A template is a SQL statement with named placeholders (`:metric`,
//! `:host`, ...). Compiling it against a [`ValueMap`] yields a
//! parameterized statement for the active [`Dialect`] plus the argument
//! list in marker order.
//!
//! ```
//! use std::collections::HashMap;
//! use template_sql::{Dialect, Value, template::compile};
//!
//! let values = HashMap::from([
//!     ("metric".to_string(), Value::from("users")),
//!     ("name".to_string(), Value::from("telegraf")),
//! ]);
//! let stmt = compile("UPDATE :metric SET name=:name", Dialect::Postgres, &values).unwrap();
//! assert_eq!(stmt.sql, "UPDATE $1 SET name=$2");
//! ```
//!
//! The placeholder pattern is `:[a-zA-Z0-9_]*`, so a colon followed by any
//! other character is a placeholder with an empty key. Templates using
//! Postgres `::type` casts therefore need an empty-string default value.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::error::{OutputError, OutputResult};
use crate::resolver::ValueMap;
use crate::value::Value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(":[a-zA-Z0-9_]*").expect("placeholder pattern is valid"));

/// A parameterized statement ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,

    /// Arguments in the order their markers appear in `sql`
    pub args: Vec<Value>,
}

#[derive(Debug, Clone)]
struct Placeholder {
    key: String,
    span: Range<usize>,
}

/// A template with its placeholder occurrences located up front
#[derive(Debug, Clone)]
pub struct Template {
    sql: String,
    placeholders: Vec<Placeholder>,
}

impl Template {
    pub fn parse(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let placeholders = PLACEHOLDER
            .find_iter(&sql)
            .map(|m| Placeholder {
                key: m.as_str()[1..].to_string(),
                span: m.range(),
            })
            .collect();

        Self { sql, placeholders }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholder keys in occurrence order, repeats included
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(|p| p.key.as_str())
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// Substitute `values` into the template for `dialect`
    ///
    /// Fails with [`OutputError::MissingTemplateValue`] on the first key
    /// not present in `values`; nothing is rendered in that case.
    pub fn compile(&self, dialect: Dialect, values: &ValueMap) -> OutputResult<CompiledStatement> {
        let args = self
            .placeholders
            .iter()
            .map(|p| {
                values
                    .get(&p.key)
                    .cloned()
                    .ok_or_else(|| OutputError::MissingTemplateValue(p.key.clone()))
            })
            .collect::<OutputResult<Vec<_>>>()?;

        let mut sql = String::with_capacity(self.sql.len());
        let mut last = 0;
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            sql.push_str(&self.sql[last..placeholder.span.start]);
            sql.push_str(&dialect.placeholder(i + 1));
            last = placeholder.span.end;
        }
        sql.push_str(&self.sql[last..]);

        Ok(CompiledStatement { sql, args })
    }
}

/// Parse and compile `template` in one step
pub fn compile(template: &str, dialect: Dialect, values: &ValueMap) -> OutputResult<CompiledStatement> {
    Template::parse(template).compile(dialect, values)
}
