//! Column type derivation
//!
//! Maps a [`Value`] to the target database's type name using the
//! configured conversion table. Only used for schema-style helpers, never
//! for binding.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::value::{Value, ValueKind};

/// How unsigned integer column types are rendered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ConversionStyle {
    /// `"<integer> <unsigned>"`, e.g. `INT UNSIGNED`
    UnsignedSuffix,

    /// `"<unsigned>"` on its own, e.g. `UInt64`
    Literal,

    /// Anything else found in the configuration
    Unknown(String),
}

impl From<String> for ConversionStyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "unsigned_suffix" => ConversionStyle::UnsignedSuffix,
            "literal" => ConversionStyle::Literal,
            _ => ConversionStyle::Unknown(value),
        }
    }
}

impl fmt::Display for ConversionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStyle::UnsignedSuffix => write!(f, "unsigned_suffix"),
            ConversionStyle::Literal => write!(f, "literal"),
            ConversionStyle::Unknown(s) => write!(f, "{s}"),
        }
    }
}

/// Type names used for each value kind (`[convert]` section)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub integer: String,
    pub real: String,
    pub text: String,
    pub timestamp: String,
    #[serde(rename = "defaultvalue", alias = "default_value")]
    pub default_value: String,
    pub unsigned: String,
    pub bool: String,
    pub conversion_style: ConversionStyle,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            integer: "INT".to_string(),
            real: "DOUBLE".to_string(),
            text: "TEXT".to_string(),
            timestamp: "TIMESTAMP".to_string(),
            default_value: "TEXT".to_string(),
            unsigned: "UNSIGNED".to_string(),
            bool: "BOOL".to_string(),
            conversion_style: ConversionStyle::UnsignedSuffix,
        }
    }
}

impl ConvertConfig {
    /// Column type for `value`
    ///
    /// An unknown conversion style is logged and falls back to the default
    /// type name.
    pub fn derive_datatype(&self, value: &Value) -> String {
        match value.kind() {
            ValueKind::Int => self.integer.clone(),
            ValueKind::Unsigned => match &self.conversion_style {
                ConversionStyle::UnsignedSuffix => format!("{} {}", self.integer, self.unsigned),
                ConversionStyle::Literal => self.unsigned.clone(),
                ConversionStyle::Unknown(style) => {
                    warn!("unknown conversion style for {} value: {style}", ValueKind::Unsigned);
                    self.default_value.clone()
                }
            },
            ValueKind::Float => self.real.clone(),
            ValueKind::String => self.text.clone(),
            ValueKind::Bool => self.bool.clone(),
            ValueKind::Timestamp => self.timestamp.clone(),
        }
    }
}
