//! # octofault-telemetry
//!
//! Severity levels and the telemetry sink capability used by octofault to
//! report device faults.
//!
//! The fault-detection core never prints anything itself. Every line it
//! produces goes through a [`TelemetrySink`], which is typically a driver
//! station display, a dashboard, or the `tracing` pipeline of the host.
//!
//! ## Example
//!
//! ```rust
//! use octofault_telemetry::prelude::*;
//!
//! let sink = MemorySink::new();
//! sink.log_at(Severity::Warning, "left_drive: stalled");
//! assert_eq!(sink.texts(), vec!["WARNING: left_drive: stalled".to_string()]);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod severity;
pub mod sink;

pub mod prelude;

pub use severity::Severity;
pub use sink::{FanoutSink, MemorySink, TelemetryLine, TelemetrySink, TracingSink};
