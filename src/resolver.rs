//! Per-record value resolution
//!
//! Builds the flat key -> value map templates are compiled against. Sources
//! are layered so that later ones win on collision:
//!
//! 1. `metric` (record name)
//! 2. `timestamp` (record time)
//! 3. configured default values
//! 4. tags
//! 5. fields

use std::collections::HashMap;

use crate::metric::{FieldValue, Record};
use crate::value::Value;

/// Key under which the record name is exposed to templates
pub const METRIC_KEY: &str = "metric";

/// Key under which the record timestamp is exposed to templates
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Resolved values for a single record
pub type ValueMap = HashMap<String, Value>;

pub fn resolve<R: Record>(record: &R, defaults: &HashMap<String, FieldValue>) -> ValueMap {
    let mut values = ValueMap::with_capacity(2 + defaults.len());

    values.insert(METRIC_KEY.to_string(), Value::String(record.name().to_string()));
    values.insert(TIMESTAMP_KEY.to_string(), Value::Timestamp(record.time()));

    for (key, value) in defaults {
        values.insert(key.clone(), value.clone().into());
    }

    for (key, value) in record.tags() {
        values.insert(key.to_string(), Value::String(value.to_string()));
    }

    for (key, value) in record.fields() {
        values.insert(key.to_string(), value.clone().into());
    }

    values
}
