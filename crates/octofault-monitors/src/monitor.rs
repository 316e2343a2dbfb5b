//! The monitor contract and the closed set of monitor variants.

use octofault_devices::{
    ChromaticSensor, Clock, ContactSensor, InertialSensor, PositionalActuator, PowerSensor,
    RangingSensor, RotaryActuator,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::chromatic::ChromaticMonitor;
use crate::contact::ContactMonitor;
use crate::inertial::InertialMonitor;
use crate::positional::PositionalMonitor;
use crate::power::PowerMonitor;
use crate::ranging::RangingMonitor;
use crate::rotary::RotaryMonitor;
use crate::thresholds::MonitorSettings;

/// Health check state machine bound to one device.
///
/// `update` is called once per tick. It must not panic and must not return
/// device failures: anything that goes wrong while reading the device ends up
/// in [`DeviceMonitor::fault_reasons`].
pub trait DeviceMonitor: Send {
    /// Unique name the monitor is registered under.
    fn name(&self) -> &str;

    /// Read the device and evaluate this monitor's fault conditions.
    fn update(&mut self);

    /// True iff no fault condition fired during the last completed `update`.
    fn is_healthy(&self) -> bool;

    /// Current fault reasons, each prefixed with its severity.
    fn fault_reasons(&self) -> &[String];

    /// Human-readable snapshot of the device, independent of health.
    fn current_value(&self) -> String;

    /// Most specific device model the monitor is watching.
    fn device_type(&self) -> &str;

    /// Apply registry-wide settings. Monitors without tunables ignore them.
    fn configure(&mut self, _settings: &MonitorSettings) {}
}

/// Category of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorKind {
    /// Motor or continuous-rotation drive.
    Rotary,
    /// Servo.
    Positional,
    /// IMU.
    Inertial,
    /// Distance sensor.
    Ranging,
    /// Color sensor.
    Chromatic,
    /// Touch sensor.
    Contact,
    /// Voltage sensor.
    Power,
    /// User-supplied monitor.
    Custom,
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorKind::Rotary => write!(f, "Rotary Actuator"),
            MonitorKind::Positional => write!(f, "Positional Actuator"),
            MonitorKind::Inertial => write!(f, "Inertial Sensor"),
            MonitorKind::Ranging => write!(f, "Ranging Sensor"),
            MonitorKind::Chromatic => write!(f, "Chromatic Sensor"),
            MonitorKind::Contact => write!(f, "Contact Sensor"),
            MonitorKind::Power => write!(f, "Power Sensor"),
            MonitorKind::Custom => write!(f, "Custom"),
        }
    }
}

/// Any monitor octofault knows how to drive.
pub enum Monitor {
    /// Motor or continuous-rotation drive.
    Rotary(RotaryMonitor),
    /// Servo.
    Positional(PositionalMonitor),
    /// IMU.
    Inertial(InertialMonitor),
    /// Distance sensor.
    Ranging(RangingMonitor),
    /// Color sensor.
    Chromatic(ChromaticMonitor),
    /// Touch sensor.
    Contact(ContactMonitor),
    /// Voltage sensor.
    Power(PowerMonitor),
    /// User-supplied monitor for devices without a built-in variant.
    Custom(Box<dyn DeviceMonitor>),
}

impl Monitor {
    /// Monitor for a rotary actuator, timed by the system clock.
    #[must_use]
    pub fn rotary(name: impl Into<String>, device: Arc<dyn RotaryActuator>) -> Self {
        Self::Rotary(RotaryMonitor::new(name, device))
    }

    /// Monitor for a rotary actuator, timed by `clock`.
    #[must_use]
    pub fn rotary_with_clock(
        name: impl Into<String>,
        device: Arc<dyn RotaryActuator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::Rotary(RotaryMonitor::with_clock(name, device, clock))
    }

    /// Monitor for a servo.
    #[must_use]
    pub fn positional(name: impl Into<String>, device: Arc<dyn PositionalActuator>) -> Self {
        Self::Positional(PositionalMonitor::new(name, device))
    }

    /// Monitor for an IMU.
    #[must_use]
    pub fn inertial(name: impl Into<String>, device: Arc<dyn InertialSensor>) -> Self {
        Self::Inertial(InertialMonitor::new(name, device))
    }

    /// Monitor for a distance sensor.
    #[must_use]
    pub fn ranging(name: impl Into<String>, device: Arc<dyn RangingSensor>) -> Self {
        Self::Ranging(RangingMonitor::new(name, device))
    }

    /// Monitor for a color sensor.
    #[must_use]
    pub fn chromatic(name: impl Into<String>, device: Arc<dyn ChromaticSensor>) -> Self {
        Self::Chromatic(ChromaticMonitor::new(name, device))
    }

    /// Monitor for a touch sensor.
    #[must_use]
    pub fn contact(name: impl Into<String>, device: Arc<dyn ContactSensor>) -> Self {
        Self::Contact(ContactMonitor::new(name, device))
    }

    /// Monitor for a voltage sensor.
    #[must_use]
    pub fn power(name: impl Into<String>, device: Arc<dyn PowerSensor>) -> Self {
        Self::Power(PowerMonitor::new(name, device))
    }

    /// Wrap a user-supplied monitor.
    #[must_use]
    pub fn custom(monitor: impl DeviceMonitor + 'static) -> Self {
        Self::Custom(Box::new(monitor))
    }

    /// Category of this monitor.
    #[must_use]
    pub fn category(&self) -> MonitorKind {
        match self {
            Monitor::Rotary(_) => MonitorKind::Rotary,
            Monitor::Positional(_) => MonitorKind::Positional,
            Monitor::Inertial(_) => MonitorKind::Inertial,
            Monitor::Ranging(_) => MonitorKind::Ranging,
            Monitor::Chromatic(_) => MonitorKind::Chromatic,
            Monitor::Contact(_) => MonitorKind::Contact,
            Monitor::Power(_) => MonitorKind::Power,
            Monitor::Custom(_) => MonitorKind::Custom,
        }
    }

    fn inner(&self) -> &dyn DeviceMonitor {
        match self {
            Monitor::Rotary(m) => m,
            Monitor::Positional(m) => m,
            Monitor::Inertial(m) => m,
            Monitor::Ranging(m) => m,
            Monitor::Chromatic(m) => m,
            Monitor::Contact(m) => m,
            Monitor::Power(m) => m,
            Monitor::Custom(m) => m.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn DeviceMonitor {
        match self {
            Monitor::Rotary(m) => m,
            Monitor::Positional(m) => m,
            Monitor::Inertial(m) => m,
            Monitor::Ranging(m) => m,
            Monitor::Chromatic(m) => m,
            Monitor::Contact(m) => m,
            Monitor::Power(m) => m,
            Monitor::Custom(m) => m.as_mut(),
        }
    }
}

impl DeviceMonitor for Monitor {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn update(&mut self) {
        self.inner_mut().update();
    }

    fn is_healthy(&self) -> bool {
        self.inner().is_healthy()
    }

    fn fault_reasons(&self) -> &[String] {
        self.inner().fault_reasons()
    }

    fn current_value(&self) -> String {
        self.inner().current_value()
    }

    fn device_type(&self) -> &str {
        self.inner().device_type()
    }

    fn configure(&mut self, settings: &MonitorSettings) {
        self.inner_mut().configure(settings);
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("category", &self.category())
            .field("name", &self.name())
            .field("device_type", &self.device_type())
            .field("healthy", &self.is_healthy())
            .field("fault_reasons", &self.fault_reasons())
            .finish()
    }
}

impl<M: DeviceMonitor + 'static> From<Box<M>> for Monitor {
    fn from(monitor: Box<M>) -> Self {
        Monitor::Custom(monitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthState;
    use octofault_telemetry::Severity;

    struct Heartbeat {
        health: HealthState,
        beats: u32,
    }

    impl DeviceMonitor for Heartbeat {
        fn name(&self) -> &str {
            self.health.name()
        }

        fn update(&mut self) {
            self.health.begin_tick();
            self.beats += 1;
            if self.beats % 2 == 0 {
                self.health.report(Severity::Info, "even beat");
            }
            self.health.finish_tick();
        }

        fn is_healthy(&self) -> bool {
            self.health.is_healthy()
        }

        fn fault_reasons(&self) -> &[String] {
            self.health.reasons()
        }

        fn current_value(&self) -> String {
            format!("Beats: {}", self.beats)
        }

        fn device_type(&self) -> &str {
            "Heartbeat"
        }
    }

    #[test]
    fn test_custom_monitor_delegation() {
        let mut monitor = Monitor::custom(Heartbeat {
            health: HealthState::new("pulse"),
            beats: 0,
        });

        assert_eq!(monitor.category(), MonitorKind::Custom);
        assert_eq!(monitor.name(), "pulse");
        assert_eq!(monitor.device_type(), "Heartbeat");

        monitor.update();
        assert!(monitor.is_healthy());
        monitor.update();
        assert!(!monitor.is_healthy());
        assert_eq!(monitor.fault_reasons(), ["INFO: pulse: even beat".to_string()]);
        assert_eq!(monitor.current_value(), "Beats: 2");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MonitorKind::Rotary.to_string(), "Rotary Actuator");
        assert_eq!(MonitorKind::Custom.to_string(), "Custom");
    }
}
