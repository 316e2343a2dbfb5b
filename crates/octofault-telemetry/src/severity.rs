//! Severity tags attached to fault reasons and telemetry lines.
//!
//! Severity is purely descriptive: nothing in octofault filters or escalates
//! on it. It only decides the `"<SEVERITY>: "` prefix of a line and, for sinks
//! backed by `tracing`, the event level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a fault reason or telemetry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// Informational notice.
    Info,
    /// Suspicious reading, device may still work.
    Warning,
    /// Device is not usable as-is.
    Error,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Upper-case tag used as the line prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// The `tracing` level this severity is emitted at.
    #[must_use]
    pub const fn as_tracing_level(self) -> tracing::Level {
        match self {
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Error => tracing::Level::ERROR,
        }
    }

    /// Prefix `text` with this severity tag.
    #[must_use]
    pub fn tag(self, text: &str) -> String {
        format!("{self}: {text}")
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
