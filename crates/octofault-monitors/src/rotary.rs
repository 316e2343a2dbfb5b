//! Rotary actuator monitor (motors and continuous-rotation drives).
//!
//! Which checks run depends on the feedback the drive offers:
//!
//! | Feedback       | Check                                                    |
//! |----------------|----------------------------------------------------------|
//! | encoder        | stall (position frozen past the window), low velocity    |
//! | busy flag only | busy while power is nearly zero                          |
//! | none           | high power without any feedback (INFO)                   |
//! | drive enable   | output disabled or unreadable, independent of the above  |
//!
//! The stall check is the only cross-tick check in octofault. It measures how
//! long the encoder position has been frozen while the drive is powered, so
//! it fires at any tick rate once that span exceeds the stall window.

use octofault_devices::{Clock, RotaryActuator, SystemClock};
use octofault_telemetry::Severity;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::health::HealthState;
use crate::monitor::DeviceMonitor;
use crate::thresholds::{MonitorSettings, Thresholds};

/// Monitor for a [`RotaryActuator`].
pub struct RotaryMonitor {
    health: HealthState,
    device: Arc<dyn RotaryActuator>,
    clock: Arc<dyn Clock>,
    thresholds: Thresholds,
    last_position: Option<i64>,
    frozen_since: Instant,
}

impl RotaryMonitor {
    /// Monitor `device` using the system clock.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn RotaryActuator>) -> Self {
        Self::with_clock(name, device, Arc::new(SystemClock))
    }

    /// Monitor `device`, timing the stall window with `clock`.
    #[must_use]
    pub fn with_clock(
        name: impl Into<String>,
        device: Arc<dyn RotaryActuator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let frozen_since = clock.now();
        Self {
            health: HealthState::new(name),
            device,
            clock,
            thresholds: Thresholds::default(),
            last_position: None,
            frozen_since,
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn RotaryActuator> {
        &self.device
    }

    /// Thresholds in effect.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Encoder position seen at the previous successful sample.
    #[must_use]
    pub fn last_position(&self) -> Option<i64> {
        self.last_position
    }

    /// Time since the encoder last moved, or last ran unpowered.
    #[must_use]
    pub fn frozen_for(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.frozen_since)
    }

    fn evaluate(&mut self) {
        let power = match self.device.power() {
            Ok(power) => power,
            Err(e) => {
                self.health
                    .report(Severity::Error, format_args!("Failed to read power: {e}"));
                return;
            }
        };

        if power.is_nan() {
            self.health.report(Severity::Error, "Power is NaN");
            return;
        }

        let features = self.device.features();
        let magnitude = power.abs();

        if features.encoder {
            self.check_encoder(magnitude);
        } else if features.busy_flag {
            match self.device.is_busy() {
                Ok(true) if magnitude < self.thresholds.busy_min_power => {
                    self.health.report(
                        Severity::Warning,
                        "Motor is busy but power is significantly low.",
                    );
                }
                Ok(_) => {}
                Err(e) => self.health.report(
                    Severity::Error,
                    format_args!("Failed to read busy flag: {e}"),
                ),
            }
        } else if magnitude > self.thresholds.open_loop_power {
            self.health.report(
                Severity::Info,
                "Power high, but no encoder feedback available.",
            );
        }

        if features.drive_enable {
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

    fn check_encoder(&mut self, power_magnitude: f64) {
        let sample = match self.device.encoder() {
            Ok(sample) => sample,
            Err(e) => {
                self.health
                    .report(Severity::Error, format_args!("Failed to read encoder: {e}"));
                return;
            }
        };
        let now = self.clock.now();
        let powered = power_magnitude > self.thresholds.motion_power;
        let frozen = self.last_position == Some(sample.position);

        // The window restarts whenever the shaft moves or power drops.
        if !frozen || !powered {
            self.frozen_since = now;
        }

        if powered {
            let elapsed = now.saturating_duration_since(self.frozen_since);
            if frozen && elapsed > self.thresholds.stall_window() {
                self.health.report(
                    Severity::Warning,
                    "Encoder not moving despite power (stalled)",
                );
            }
            if sample.velocity.abs() < self.thresholds.min_velocity {
                self.health.report(
                    Severity::Warning,
                    "Velocity too low under power (possible stall)",
                );
            }
        }

        self.last_position = Some(sample.position);
    }
}

impl DeviceMonitor for RotaryMonitor {
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
        let power = match self.device.power() {
            Ok(power) => power,
            Err(e) => return format!("Power read failed: {e}"),
        };

        let mut out = format!("Power: {power:.2}");
        let features = self.device.features();
        if features.encoder {
            match self.device.encoder() {
                Ok(sample) => out.push_str(&format!(
                    ", Pos: {}, Vel: {:.2}",
                    sample.position, sample.velocity
                )),
                Err(e) => out.push_str(&format!(", Encoder read failed: {e}")),
            }
        }
        if features.busy_flag
            && let Ok(busy) = self.device.is_busy()
        {
            out.push_str(&format!(", Busy: {busy}"));
        }
        out
    }

    fn device_type(&self) -> &str {
        self.device.model()
    }

    fn configure(&mut self, settings: &MonitorSettings) {
        self.health.set_accumulation(settings.accumulation);
        self.thresholds = settings.thresholds;
    }
}

impl fmt::Debug for RotaryMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotaryMonitor")
            .field("health", &self.health)
            .field("model", &self.device.model())
            .field("last_position", &self.last_position)
            .finish_non_exhaustive()
    }
}
