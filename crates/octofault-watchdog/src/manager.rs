//! The fault manager: name-keyed owner of every monitor.
//!
//! One call to [`FaultManager::update_all`] is one tick. Monitors are updated
//! in no particular order; each faulty monitor produces exactly one fault
//! line on the sink.

use octofault_monitors::{DeviceMonitor, Monitor, MonitorSettings};
use octofault_telemetry::{Severity, TelemetrySink};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::FaultManagerConfig;
use crate::error::{WatchdogError, WatchdogResult};

/// One unhealthy monitor, as reported after a tick.
///
/// Its [`Display`](fmt::Display) form is the fault line sent to the sink:
/// `"<name> is faulty: [<reason>, <reason>]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultLine {
    /// Monitor name.
    pub name: String,
    /// Fault reasons at the end of the tick.
    pub reasons: Vec<String>,
}

impl FaultLine {
    fn of(monitor: &Monitor) -> Self {
        Self {
            name: monitor.name().to_string(),
            reasons: monitor.fault_reasons().to_vec(),
        }
    }
}

impl fmt::Display for FaultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is faulty: [{}]", self.name, self.reasons.join(", "))
    }
}

/// Outcome of one [`FaultManager::update_all`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Wall-clock duration of the pass.
    pub duration: Duration,
    /// Number of monitors updated.
    pub monitors_checked: usize,
    /// Monitors that ended the tick unhealthy.
    pub faulty: Vec<FaultLine>,
}

impl TickReport {
    /// True if every monitor ended the tick healthy.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.faulty.is_empty()
    }

    /// Names of the faulty monitors, sorted.
    #[must_use]
    pub fn faulty_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.faulty.iter().map(|line| line.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Name-keyed registry of monitors that drives ticks and forwards fault text.
pub struct FaultManager {
    config: FaultManagerConfig,
    monitors: HashMap<String, Monitor>,
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl FaultManager {
    /// Create an empty manager with the default configuration and no sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FaultManagerConfig::default(),
            monitors: HashMap::new(),
            sink: None,
        }
    }

    /// Create an empty manager with `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: FaultManagerConfig) -> WatchdogResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &FaultManagerConfig {
        &self.config
    }

    /// Replace the monitor settings and push them into every registered monitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid; nothing changes then.
    pub fn set_monitor_settings(&mut self, settings: MonitorSettings) -> WatchdogResult<()> {
        settings.validate()?;
        self.config.monitor = settings;
        for monitor in self.monitors.values_mut() {
            monitor.configure(&settings);
        }
        Ok(())
    }

    /// Enable or disable the timing line.
    pub fn set_report_tick_duration(&mut self, enabled: bool) {
        self.config.report_tick_duration = enabled;
    }

    /// Register `monitor` under its name, returning the monitor it replaced.
    ///
    /// The manager's monitor settings are applied before insertion.
    pub fn register(&mut self, mut monitor: Monitor) -> Option<Monitor> {
        monitor.configure(&self.config.monitor);
        let name = monitor.name().to_string();
        tracing::debug!(monitor = %name, category = %monitor.category(), "Monitor registered");
        self.monitors.insert(name, monitor)
    }

    /// Monitor registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Monitor> {
        self.monitors.get(name)
    }

    /// True if a monitor is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.monitors.contains_key(name)
    }

    /// Mutable access to the monitor registered under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Monitor> {
        self.monitors.get_mut(name)
    }

    /// Like [`FaultManager::get`], but a missing monitor is an error.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::MonitorNotFound`] if no monitor has that name.
    pub fn require(&self, name: &str) -> WatchdogResult<&Monitor> {
        self.get(name)
            .ok_or_else(|| WatchdogError::monitor_not_found(name))
    }

    /// Unregister and return the monitor registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Monitor> {
        self.monitors.remove(name)
    }

    /// Unregister every monitor.
    pub fn remove_all(&mut self) {
        self.monitors.clear();
    }

    /// Every registered monitor, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.values()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.monitors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered monitors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// True if no monitor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Send fault and timing lines to `sink`.
    pub fn set_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sink = Some(sink);
    }

    /// Stop emitting telemetry.
    pub fn clear_sink(&mut self) -> Option<Arc<dyn TelemetrySink>> {
        self.sink.take()
    }

    /// The configured sink, if any.
    #[must_use]
    pub fn sink(&self) -> Option<&Arc<dyn TelemetrySink>> {
        self.sink.as_ref()
    }

    /// Run one tick: update every monitor once and report the faulty ones.
    ///
    /// A fault line is emitted right after the faulty monitor's update. The
    /// timing line, when enabled, comes after all monitors.
    pub fn update_all(&mut self) -> TickReport {
        let start = Instant::now();
        let mut faulty = Vec::new();

        for monitor in self.monitors.values_mut() {
            monitor.update();
            if monitor.is_healthy() {
                continue;
            }

            let line = FaultLine::of(monitor);
            tracing::debug!(
                monitor = %line.name,
                reasons = line.reasons.len(),
                "Monitor reported faults"
            );
            if let Some(sink) = &self.sink {
                sink.log(&line.to_string());
            }
            faulty.push(line);
        }

        let duration = start.elapsed();
        if self.config.report_tick_duration
            && let Some(sink) = &self.sink
        {
            sink.log_at(
                Severity::Info,
                &format!(
                    "FaultManager took {}ms to update (Tick Complete)",
                    duration.as_millis()
                ),
            );
        }
        if duration > self.config.tick_budget() {
            tracing::warn!(
                elapsed_ms = duration.as_millis(),
                budget_ms = self.config.tick_budget_ms,
                monitors = self.monitors.len(),
                "Fault manager tick exceeded its budget"
            );
        }

        TickReport {
            duration,
            monitors_checked: self.monitors.len(),
            faulty,
        }
    }

    /// Health of every monitor after the last tick, keyed by name.
    #[must_use]
    pub fn health_summary(&self) -> BTreeMap<String, bool> {
        self.monitors
            .iter()
            .map(|(name, monitor)| (name.clone(), monitor.is_healthy()))
            .collect()
    }

    /// Names of the monitors currently unhealthy, sorted.
    #[must_use]
    pub fn faulty_monitors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .monitors
            .iter()
            .filter(|(_, monitor)| !monitor.is_healthy())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for FaultManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FaultManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultManager")
            .field("config", &self.config)
            .field("monitors", &self.names())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofault_monitors::FaultAccumulation;
    use octofault_telemetry::MemorySink;
    use octofault_test_helpers::prelude::*;

    fn quiet_manager(sink: &Arc<MemorySink>) -> FaultManager {
        let mut manager = FaultManager::new();
        manager.set_report_tick_duration(false);
        manager.set_sink(sink.clone());
        manager
    }

    #[test]
    fn test_register_then_get_returns_same_monitor() {
        let mut manager = FaultManager::new();
        assert!(manager.register(Monitor::ranging("front", Arc::new(MockRangefinder::new(1.0)))).is_none());

        let monitor = manager.get("front");
        assert!(matches!(monitor, Some(Monitor::Ranging(_))));
        assert_eq!(manager.len(), 1);

        assert!(manager.remove("front").is_some());
        assert!(manager.get("front").is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_same_name_replaces() {
        let mut manager = FaultManager::new();
        manager.register(Monitor::ranging("slot", Arc::new(MockRangefinder::new(1.0))));
        let replaced = manager.register(Monitor::contact("slot", Arc::new(MockTouchSensor::new())));

        assert!(matches!(replaced, Some(Monitor::Ranging(_))));
        assert!(matches!(manager.get("slot"), Some(Monitor::Contact(_))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_fault_line_format() {
        let line = FaultLine {
            name: "arm".to_string(),
            reasons: vec!["WARNING: arm: a".to_string(), "ERROR: arm: b".to_string()],
        };
        assert_eq!(line.to_string(), "arm is faulty: [WARNING: arm: a, ERROR: arm: b]");
    }

    #[test]
    fn test_update_all_emits_one_line_per_faulty_monitor() {
        let sink = Arc::new(MemorySink::new());
        let mut manager = quiet_manager(&sink);
        manager.register(Monitor::ranging("good", Arc::new(MockRangefinder::new(10.0))));
        manager.register(Monitor::ranging("bad", Arc::new(MockRangefinder::new(-5.0))));

        let report = manager.update_all();
        assert_eq!(report.monitors_checked, 2);
        assert_eq!(report.faulty_names(), vec!["bad"]);
        assert_eq!(
            sink.texts(),
            vec!["bad is faulty: [WARNING: bad: Invalid distance reading: -5.0]".to_string()]
        );
    }

    #[test]
    fn test_timing_line_follows_fault_lines() {
        let sink = Arc::new(MemorySink::new());
        let mut manager = FaultManager::new();
        manager.set_sink(sink.clone());
        manager.register(Monitor::ranging("bad", Arc::new(MockRangefinder::new(-5.0))));

        manager.update_all();
        let texts = sink.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts.first().is_some_and(|t| t.starts_with("bad is faulty: ")));
        assert!(texts.last().is_some_and(|t| {
            t.starts_with("INFO: FaultManager took ") && t.ends_with("ms to update (Tick Complete)")
        }));
    }

    #[test]
    fn test_no_sink_still_ticks() {
        let mut manager = FaultManager::new();
        manager.register(Monitor::ranging("bad", Arc::new(MockRangefinder::new(-5.0))));

        let report = manager.update_all();
        assert!(!report.is_clean());
        assert_eq!(manager.faulty_monitors(), vec!["bad"]);
    }

    #[test]
    fn test_settings_reach_registered_monitors() -> TestResult {
        let sink = Arc::new(MemorySink::new());
        let mut manager = quiet_manager(&sink);
        manager.register(Monitor::ranging("bad", Arc::new(MockRangefinder::new(-5.0))));
        manager.set_monitor_settings(MonitorSettings {
            accumulation: FaultAccumulation::Sticky,
            ..MonitorSettings::default()
        })?;

        manager.update_all();
        manager.update_all();
        let monitor = manager.require("bad")?;
        assert_eq!(monitor.fault_reasons().len(), 2);
        Ok(())
    }

    #[test]
    fn test_require_missing_monitor() {
        let manager = FaultManager::new();
        assert_eq!(
            manager.require("ghost").err(),
            Some(WatchdogError::monitor_not_found("ghost"))
        );
    }

    #[test]
    fn test_health_summary() {
        let mut manager = FaultManager::new();
        manager.set_report_tick_duration(false);
        manager.register(Monitor::ranging("a", Arc::new(MockRangefinder::new(10.0))));
        manager.register(Monitor::ranging("b", Arc::new(MockRangefinder::new(-1.0))));
        manager.update_all();

        let summary = manager.health_summary();
        assert_eq!(summary.get("a"), Some(&true));
        assert_eq!(summary.get("b"), Some(&false));

        manager.remove_all();
        assert!(manager.health_summary().is_empty());
    }
}
