//! Chromatic (color) sensor monitor.
//!
//! Channel sanity is checked on every color sensor. Bus health and white
//! balance are only checked on sensors that expose diagnostics.

use octofault_devices::{BusStatus, ChromaticSensor, ColorChannels};
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::{MonitorSettings, Thresholds};

/// Monitor for a [`ChromaticSensor`].
pub struct ChromaticMonitor {
    health: HealthState,
    device: Arc<dyn ChromaticSensor>,
    thresholds: Thresholds,
}

impl ChromaticMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn ChromaticSensor>) -> Self {
        Self {
            health: HealthState::new(name),
            device,
            thresholds: Thresholds::default(),
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn ChromaticSensor> {
        &self.device
    }

    fn evaluate(&mut self) {
        let channels = match self.device.channels() {
            Ok(channels) => channels,
            Err(e) => {
                self.health.report(
                    Severity::Error,
                    format_args!("Failed to read color channels: {e}"),
                );
                return;
            }
        };

        let values = channels.as_array();
        if values.iter().any(|v| *v < 0.0) {
            self.health
                .report(Severity::Warning, "One or more color values are negative.");
        }
        if values.iter().any(|v| v.is_nan()) {
            self.health.report(Severity::Warning, "Color value is NaN.");
        }

        let Some(bus) = self.device.bus_status() else {
            return;
        };
        match bus {
            Ok(status) => self.check_bus(status),
            Err(e) => self.health.report(
                Severity::Error,
                format_args!("Failed to read I2C status: {e}"),
            ),
        }

        if white_balance_uneven(&channels, self.thresholds.white_balance_tolerance) {
            self.health.report(
                Severity::Info,
                "White balance significantly uneven (possible color cast or lighting issue)",
            );
        }
    }

    fn check_bus(&mut self, status: BusStatus) {
        if !status.armed {
            self.health.report(
                Severity::Error,
                "I2C client not armed (communication lost?)",
            );
        }
        if !status.has_valid_address() {
            self.health
                .report(Severity::Error, "Invalid or missing I2C address.");
        }
    }
}

/// True if any two RGB shares of the channel sum differ by more than
/// `tolerance`. A zero or non-positive sum never counts as uneven.
fn white_balance_uneven(channels: &ColorChannels, tolerance: f64) -> bool {
    let total = channels.rgb_sum();
    if total.is_nan() || total <= 0.0 {
        return false;
    }
    let red = channels.red / total;
    let green = channels.green / total;
    let blue = channels.blue / total;
    (red - green).abs() > tolerance
        || (red - blue).abs() > tolerance
        || (green - blue).abs() > tolerance
}

impl DeviceMonitor for ChromaticMonitor {
    fn name(&self) -> &str {
        self.health.name()
    }

    fn update(&mut self) {
        self.health.begin_tick();
        self.evaluate();
        self.health.finish_tick();
    }

    fn is_healthy(&self) -> bool {
        self.health.is_healthy()
    }

    fn fault_reasons(&self) -> &[String] {
        self.health.reasons()
    }

    fn current_value(&self) -> String {
        match self.device.channels() {
            Ok(c) => format!(
                "R: {}, G: {}, B: {}, A: {}",
                c.red, c.green, c.blue, c.alpha
            ),
            Err(e) => format!("Sensor read failed: {e}"),
        }
    }

    fn device_type(&self) -> &str {
        self.device.model()
    }

    fn configure(&mut self, settings: &MonitorSettings) {
        self.health.set_accumulation(settings.accumulation);
        self.thresholds = settings.thresholds;
    }
}

impl fmt::Debug for ChromaticMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromaticMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .finish_non_exhaustive()
    }
}
