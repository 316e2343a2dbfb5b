//! Error types for octofault-sim

use std::path::PathBuf;
use thiserror::Error;

use octofault_watchdog::WatchdogError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Failed to read scenario {path}: {source}")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario {path}: {reason}")]
    ScenarioParse { path: PathBuf, reason: String },

    #[error("Unsupported scenario format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] WatchdogError),
}
