//! Template values
//!
//! Every value that can be substituted into a template is one of a closed
//! set of kinds. Consumers (argument binding, datatype derivation) match on
//! [`Value`] exhaustively, so adding a kind forces every site to handle it.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::metric::FieldValue;

/// A single value bound to a template placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// The kind of a [`Value`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Unsigned,
    Float,
    String,
    Bool,
    Timestamp,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Unsigned(_) => ValueKind::Unsigned,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Timestamp(_) => ValueKind::Timestamp,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Unsigned => write!(f, "unsigned"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Int(v) => Value::Int(v),
            FieldValue::Unsigned(v) => Value::Unsigned(v),
            FieldValue::Float(v) => Value::Float(v),
            FieldValue::String(v) => Value::String(v),
            FieldValue::Bool(v) => Value::Bool(v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Unsigned(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}
