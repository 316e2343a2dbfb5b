//! Telemetry sinks.
//!
//! A [`TelemetrySink`] is the only way octofault talks to the outside world.
//! Implementors provide [`TelemetrySink::emit`]; the four logging entry points
//! are provided methods so the line formats stay identical across sinks:
//!
//! | Call | Line |
//! |---|---|
//! | `log(msg)` | `msg` |
//! | `log_at(sev, msg)` | `SEV: msg` |
//! | `log_value(v)` | `OBJECT : v` |
//! | `log_value_at(sev, v)` | `SEV: OBJECT GIVEN : v` |

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::severity::Severity;

/// Consumer of formatted telemetry lines.
///
/// Sinks must never panic and should not block: they are called from inside
/// the control loop tick.
pub trait TelemetrySink: Send + Sync {
    /// Deliver one fully formatted line.
    ///
    /// `level` is `None` for unleveled calls; sinks that need a level treat
    /// those as [`Severity::Info`].
    fn emit(&self, level: Option<Severity>, line: &str);

    /// Log an unleveled message.
    fn log(&self, message: &str) {
        self.emit(None, message);
    }

    /// Log a message with a severity prefix.
    fn log_at(&self, severity: Severity, message: &str) {
        self.emit(Some(severity), &severity.tag(message));
    }

    /// Log an arbitrary value dump.
    fn log_value(&self, value: &dyn fmt::Display) {
        self.emit(None, &format!("OBJECT : {value}"));
    }

    /// Log an arbitrary value dump with a severity prefix.
    fn log_value_at(&self, severity: Severity, value: &dyn fmt::Display) {
        self.emit(
            Some(severity),
            &format!("{severity}: OBJECT GIVEN : {value}"),
        );
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Arc<S> {
    fn emit(&self, level: Option<Severity>, line: &str) {
        (**self).emit(level, line);
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    fn emit(&self, level: Option<Severity>, line: &str) {
        (**self).emit(level, line);
    }
}

/// One line captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryLine {
    /// Level the line was emitted with, `None` for unleveled lines.
    pub level: Option<Severity>,
    /// The formatted text.
    pub text: String,
}

impl TelemetryLine {
    /// Effective level, unleveled lines count as informational.
    #[must_use]
    pub fn effective_level(&self) -> Severity {
        self.level.unwrap_or(Severity::Info)
    }
}

/// Sink that keeps every line in memory.
///
/// Used by tests and by the simulator to print what a tick produced.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<TelemetryLine>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured lines.
    #[must_use]
    pub fn lines(&self) -> Vec<TelemetryLine> {
        self.lines.lock().clone()
    }

    /// Snapshot of the captured text only.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lines.lock().iter().map(|l| l.text.clone()).collect()
    }

    /// Remove and return everything captured so far.
    pub fn drain(&self) -> Vec<TelemetryLine> {
        std::mem::take(&mut *self.lines.lock())
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// True if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drop all captured lines.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// True if any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.text.contains(needle))
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&self, level: Option<Severity>, line: &str) {
        self.lines.lock().push(TelemetryLine {
            level,
            text: line.to_owned(),
        });
    }
}

/// Sink that forwards every line as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a tracing-backed sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TelemetrySink for TracingSink {
    fn emit(&self, level: Option<Severity>, line: &str) {
        match level.unwrap_or(Severity::Info) {
            Severity::Debug => tracing::debug!(target: "octofault::telemetry", "{line}"),
            Severity::Info => tracing::info!(target: "octofault::telemetry", "{line}"),
            Severity::Warning => tracing::warn!(target: "octofault::telemetry", "{line}"),
            Severity::Error => tracing::error!(target: "octofault::telemetry", "{line}"),
        }
    }
}

/// Sink that mirrors every line to several inner sinks, in insertion order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl FanoutSink {
    /// Create a fanout with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a target sink in place.
    pub fn push(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sinks.push(sink);
    }

    /// Number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TelemetrySink for FanoutSink {
    fn emit(&self, level: Option<Severity>, line: &str) {
        for sink in &self.sinks {
            sink.emit(level, line);
        }
    }
}

impl fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
