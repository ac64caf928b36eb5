//! Metric records consumed by the output
//!
//! A [`Metric`] is one time-series point: a measurement name, string tags,
//! typed fields and a timestamp. The binary reads them as one JSON object
//! per line:
//!
//! ```json
//! {"name":"cpu","tags":{"host":"a"},"fields":{"usage":12.5},"timestamp":"2024-01-01T00:00:00Z"}
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed field or default value
///
/// Integers that fit into `i64` deserialize as [`FieldValue::Int`], larger
/// ones as [`FieldValue::Unsigned`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
}

/// Accessors the value resolver needs from a record
pub trait Record {
    fn name(&self) -> &str;

    fn time(&self) -> DateTime<Utc>;

    fn tags(&self) -> impl Iterator<Item = (&str, &str)>;

    fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,

    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

impl Record for Metric {
    fn name(&self) -> &str {
        &self.name
    }

    fn time(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
