//! Positional actuator (servo) monitor.
//!
//! A servo reports no electrical feedback, so only the commanded position
//! and the output-enable status can be checked.

use octofault_devices::PositionalActuator;
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::{MonitorSettings, Thresholds};

/// Monitor for a [`PositionalActuator`].
pub struct PositionalMonitor {
    health: HealthState,
    device: Arc<dyn PositionalActuator>,
    thresholds: Thresholds,
}

impl PositionalMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn PositionalActuator>) -> Self {
        Self {
            health: HealthState::new(name),
            device,
            thresholds: Thresholds::default(),
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn PositionalActuator> {
        &self.device
    }

    fn evaluate(&mut self) {
        let (min, max) = (self.thresholds.servo_min, self.thresholds.servo_max);
        match self.device.position() {
            Ok(position) if position.is_nan() || position < min || position > max => {
                self.health.report(
                    Severity::Error,
                    format_args!("Position {position:.2} out of range [{min:?}, {max:?}] or unknown"),
                );
            }
            Ok(_) => {}
            Err(e) => self
                .health
                .report(Severity::Error, format_args!("Failed to read position: {e}")),
        }

        match self.device.drive_enabled() {
            Ok(true) => {}
            Ok(false) => self.health.report(Severity::Error, "PWM is not enabled"),
            Err(e) => self.health.report(
                Severity::Error,
                format_args!("Error reading PWM status: {e}"),
            ),
        }
    }
}

impl DeviceMonitor for PositionalMonitor {
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
        let position = match self.device.position() {
            Ok(position) => position,
            Err(e) => return format!("Servo read failed: {e}"),
        };
        match self.device.drive_enabled() {
            Ok(enabled) => format!("Target Position: {position:.2}, PWM Enabled: {enabled}"),
            Err(_) => format!("Target Position: {position:.2}, PWM Enabled: unknown"),
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

impl fmt::Debug for PositionalMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionalMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .finish_non_exhaustive()
    }
}
