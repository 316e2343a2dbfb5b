//! Prelude for octofault-telemetry.
//!
//! ```rust
//! use octofault_telemetry::prelude::*;
//! ```

pub use crate::severity::Severity;
pub use crate::sink::{FanoutSink, MemorySink, TelemetryLine, TelemetrySink, TracingSink};
