//! Contact (touch) sensor monitor.

use octofault_devices::ContactSensor;
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::{MonitorSettings, Thresholds};

/// Monitor for a [`ContactSensor`].
pub struct ContactMonitor {
    health: HealthState,
    device: Arc<dyn ContactSensor>,
    thresholds: Thresholds,
}

impl ContactMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn ContactSensor>) -> Self {
        Self {
            health: HealthState::new(name),
            device,
            thresholds: Thresholds::default(),
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn ContactSensor> {
        &self.device
    }

    fn evaluate(&mut self) {
        let (min, max) = (self.thresholds.contact_min, self.thresholds.contact_max);
        match self.device.value() {
            Ok(value) if value.is_nan() => self
                .health
                .report(Severity::Error, "Touch sensor reading is NaN."),
            Ok(value) if value < min || value > max => self.health.report(
                Severity::Warning,
                format_args!("Touch sensor value out of expected range [{min:?}, {max:?}]."),
            ),
            Ok(_) => {}
            Err(e) => self.health.report(
                Severity::Error,
                format_args!("Failed to read touch sensor: {e}"),
            ),
        }
    }
}

impl DeviceMonitor for ContactMonitor {
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
        match (self.device.is_pressed(), self.device.value()) {
            (Ok(pressed), Ok(value)) => format!("Touched: {pressed}, Value: {value:.2}"),
            (Err(e), _) | (_, Err(e)) => format!("Touch read failed: {e}"),
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

impl fmt::Debug for ContactMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .finish_non_exhaustive()
    }
}
