//! Ranging (distance) sensor monitor.

use octofault_devices::RangingSensor;
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::{MonitorSettings, Thresholds};

/// Monitor for a [`RangingSensor`].
pub struct RangingMonitor {
    health: HealthState,
    device: Arc<dyn RangingSensor>,
    thresholds: Thresholds,
}

impl RangingMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn RangingSensor>) -> Self {
        Self {
            health: HealthState::new(name),
            device,
            thresholds: Thresholds::default(),
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn RangingSensor> {
        &self.device
    }

    fn evaluate(&mut self) {
        match self.device.distance_cm() {
            Ok(distance)
                if distance.is_nan()
                    || distance < 0.0
                    || distance > self.thresholds.max_distance_cm =>
            {
                // Debug keeps the decimal point: -5.0 rather than -5.
                self.health.report(
                    Severity::Warning,
                    format_args!("Invalid distance reading: {distance:?}"),
                );
            }
            Ok(_) => {}
            Err(e) => self
                .health
                .report(Severity::Error, format_args!("Failed to read distance: {e}")),
        }
    }
}

impl DeviceMonitor for RangingMonitor {
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
        match self.device.distance_cm() {
            Ok(distance) => format!("Distance(CM) : {distance:?}"),
            Err(e) => format!("Distance read failed: {e}"),
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

impl fmt::Debug for RangingMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangingMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .finish_non_exhaustive()
    }
}
