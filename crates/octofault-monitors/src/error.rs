//! Error types for monitor configuration.
//!
//! Monitor evaluation itself never fails: device read errors become fault
//! reasons. Only invalid settings are reported through [`MonitorError`].

use thiserror::Error;

/// Errors raised while configuring monitors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A threshold is out of its valid domain.
    #[error("Invalid threshold {name}: {reason}")]
    InvalidThreshold {
        /// Threshold field name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl MonitorError {
    /// Create an invalid threshold error.
    #[must_use]
    pub fn invalid_threshold(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            name,
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for monitor configuration.
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
