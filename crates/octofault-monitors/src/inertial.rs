//! Inertial sensor (IMU) monitor.

use octofault_devices::InertialSensor;
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::MonitorSettings;

/// Monitor for an [`InertialSensor`].
///
/// A failed read aborts the remaining checks of the tick; missing data
/// (`None`) is a fault but does not.
pub struct InertialMonitor {
    health: HealthState,
    device: Arc<dyn InertialSensor>,
}

impl InertialMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn InertialSensor>) -> Self {
        Self {
            health: HealthState::new(name),
            device,
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn InertialSensor> {
        &self.device
    }

    fn evaluate(&mut self) {
        match self.device.angular_velocity() {
            Ok(Some(_)) => {}
            Ok(None) => self
                .health
                .report(Severity::Warning, "Angular velocity data unavailable"),
            Err(e) => {
                self.health
                    .report(Severity::Error, format_args!("Failed to read IMU: {e}"));
                return;
            }
        }

        match self.device.orientation() {
            Ok(Some(orientation)) if orientation.has_nan() => self
                .health
                .report(Severity::Warning, "Yaw, Pitch, or Roll is NaN"),
            Ok(Some(_)) => {}
            Ok(None) => self
                .health
                .report(Severity::Error, "Orientation data unavailable"),
            Err(e) => self
                .health
                .report(Severity::Error, format_args!("Failed to read IMU: {e}")),
        }
    }
}

impl DeviceMonitor for InertialMonitor {
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
        match self.device.orientation() {
            Ok(Some(o)) => format!(
                "Orientation [°]: Yaw: {:.1}, Pitch: {:.1}, Roll: {:.1}",
                o.yaw, o.pitch, o.roll
            ),
            Ok(None) => "Orientation unavailable".to_string(),
            Err(e) => Severity::Debug.tag(&format!("Failed to read IMU: {e}")),
        }
    }

    fn device_type(&self) -> &str {
        self.device.model()
    }

    fn configure(&mut self, settings: &MonitorSettings) {
        self.health.set_accumulation(settings.accumulation);
    }
}

impl fmt::Debug for InertialMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InertialMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .finish_non_exhaustive()
    }
}
