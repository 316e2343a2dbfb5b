//! Fault manager configuration.

use octofault_monitors::{FaultAccumulation, MonitorSettings, Thresholds};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{WatchdogError, WatchdogResult};

/// Configuration for a [`FaultManager`](crate::FaultManager).
///
/// Every field has a default, so a partial YAML or JSON document is enough:
///
/// ```rust
/// use octofault_watchdog::prelude::*;
///
/// let config = FaultManagerConfig::from_yaml_str("
/// tick_budget_ms: 20
/// monitor:
///   accumulation: sticky
///   thresholds:
///     stall_window_ms: 500
/// ")?;
/// assert_eq!(config.monitor.accumulation, FaultAccumulation::Sticky);
/// assert_eq!(config.monitor.thresholds.stall_window_ms, 500);
/// assert!(config.report_tick_duration);
/// # Ok::<(), WatchdogError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultManagerConfig {
    /// Emit the INFO timing line after every pass.
    pub report_tick_duration: bool,
    /// A pass slower than this is logged as a warning (milliseconds).
    pub tick_budget_ms: u64,
    /// Settings pushed into every built-in monitor on registration.
    pub monitor: MonitorSettings,
}

impl Default for FaultManagerConfig {
    fn default() -> Self {
        Self {
            report_tick_duration: true,
            tick_budget_ms: 50,
            monitor: MonitorSettings::default(),
        }
    }
}

impl FaultManagerConfig {
    /// Tick budget as a [`Duration`].
    #[must_use]
    pub fn tick_budget(&self) -> Duration {
        Duration::from_millis(self.tick_budget_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick budget is zero or a threshold is invalid.
    pub fn validate(&self) -> WatchdogResult<()> {
        if self.tick_budget_ms == 0 {
            return Err(WatchdogError::invalid_configuration(
                "tick_budget_ms must be greater than 0",
            ));
        }
        self.monitor.validate()?;
        Ok(())
    }

    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::ConfigParse`] if the text is not valid YAML
    /// for this type, or a validation error.
    pub fn from_yaml_str(text: &str) -> WatchdogResult<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| WatchdogError::config_parse("YAML", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::ConfigParse`] if the text is not valid JSON
    /// for this type, or a validation error.
    pub fn from_json_str(text: &str) -> WatchdogResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| WatchdogError::config_parse("JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> FaultManagerConfigBuilder {
        FaultManagerConfigBuilder::default()
    }
}

/// Builder for [`FaultManagerConfig`].
#[derive(Debug, Default)]
pub struct FaultManagerConfigBuilder {
    config: FaultManagerConfig,
}

impl FaultManagerConfigBuilder {
    /// Enable or disable the timing line.
    #[must_use]
    pub fn report_tick_duration(mut self, enabled: bool) -> Self {
        self.config.report_tick_duration = enabled;
        self
    }

    /// Set the tick budget.
    #[must_use]
    pub fn tick_budget(mut self, budget: Duration) -> Self {
        self.config.tick_budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the fault reason accumulation policy.
    #[must_use]
    pub fn accumulation(mut self, accumulation: FaultAccumulation) -> Self {
        self.config.monitor.accumulation = accumulation;
        self
    }

    /// Set the detection thresholds.
    #[must_use]
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.config.monitor.thresholds = thresholds;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> WatchdogResult<FaultManagerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
