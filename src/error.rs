//! Error types for template compilation and statement execution

use std::fmt;

use crate::dialect::Dialect;

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Errors that can occur while writing metrics
#[derive(Debug)]
pub enum OutputError {
    /// A template references a key the metric does not provide
    MissingTemplateValue(String),

    /// The driver identifier in the configuration is not a known dialect
    UnknownDialect(String),

    /// No driver has been registered for the dialect
    DriverNotRegistered(Dialect),

    /// The process-wide driver registry was installed twice
    RegistryAlreadyInstalled,

    /// Opening or pinging the database failed
    ConnectionFailed(String),

    /// Running the configured init statement failed
    InitFailed(String),

    /// A write was attempted before `connect`
    NotConnected,

    /// Starting a transaction failed
    BeginFailed(String),

    /// Preparing a statement failed
    PrepareFailed(String),

    /// Executing a statement failed
    ExecutionFailed(String),

    /// Committing a transaction failed
    CommitFailed(String),

    /// Invalid configuration
    InvalidConfig(String),

    /// I/O error (config file access, etc.)
    IoError(std::io::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::MissingTemplateValue(key) => write!(f, "{} not found in metric", key),
            OutputError::UnknownDialect(name) => write!(f, "unknown sql driver: {}", name),
            OutputError::DriverNotRegistered(dialect) => {
                write!(f, "no driver registered for dialect {}", dialect)
            }
            OutputError::RegistryAlreadyInstalled => {
                write!(f, "driver registry has already been installed")
            }
            OutputError::ConnectionFailed(msg) => {
                write!(f, "failed to connect to database: {}", msg)
            }
            OutputError::InitFailed(msg) => write!(f, "init sql failed: {}", msg),
            OutputError::NotConnected => write!(f, "output is not connected"),
            OutputError::BeginFailed(msg) => write!(f, "begin failed: {}", msg),
            OutputError::PrepareFailed(msg) => write!(f, "prepare failed: {}", msg),
            OutputError::ExecutionFailed(msg) => write!(f, "execution failed: {}", msg),
            OutputError::CommitFailed(msg) => write!(f, "commit failed: {}", msg),
            OutputError::InvalidConfig(msg) => write!(f, "invalid output configuration: {}", msg),
            OutputError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        OutputError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_message_names_key() {
        let err = OutputError::MissingTemplateValue("name".to_string());
        assert_eq!(err.to_string(), "name not found in metric");
    }

    #[test]
    fn test_phase_messages() {
        assert!(
            OutputError::BeginFailed("x".into())
                .to_string()
                .starts_with("begin failed")
        );
        assert!(
            OutputError::CommitFailed("x".into())
                .to_string()
                .starts_with("commit failed")
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = OutputError::from(std::io::Error::other("disk"));
        assert!(err.source().is_some());
        assert!(OutputError::NotConnected.source().is_none());
    }
}
