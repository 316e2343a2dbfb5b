//! Error types for the fault manager.
//!
//! Ticks never fail. These errors come from configuration and from lookups
//! that the caller asked to be strict.

use octofault_monitors::MonitorError;
use thiserror::Error;

/// Errors that can occur while configuring or querying a fault manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchdogError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No monitor is registered under the name.
    #[error("Monitor not found: {0}")]
    MonitorNotFound(String),

    /// Configuration text could not be parsed.
    #[error("Failed to parse {format} configuration: {reason}")]
    ConfigParse {
        /// `"YAML"` or `"JSON"`.
        format: &'static str,
        /// Parser message.
        reason: String,
    },
}

impl WatchdogError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a monitor not found error.
    #[must_use]
    pub fn monitor_not_found(name: impl Into<String>) -> Self {
        Self::MonitorNotFound(name.into())
    }

    /// Create a configuration parse error.
    #[must_use]
    pub fn config_parse(format: &'static str, reason: impl ToString) -> Self {
        Self::ConfigParse {
            format,
            reason: reason.to_string(),
        }
    }
}

impl From<MonitorError> for WatchdogError {
    fn from(err: MonitorError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

/// A specialized `Result` type for fault manager operations.
pub type WatchdogResult<T> = std::result::Result<T, WatchdogError>;
