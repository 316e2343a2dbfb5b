//! Power (supply voltage) sensor monitor.
//!
//! No fault logic is defined for supply voltage; the monitor exists so the
//! reading shows up next to the other devices.

use octofault_devices::PowerSensor;
use std::fmt;
use std::sync::Arc;

use crate::monitor::DeviceMonitor;

/// Monitor for a [`PowerSensor`]. Always healthy.
pub struct PowerMonitor {
    name: String,
    device: Arc<dyn PowerSensor>,
}

impl PowerMonitor {
    /// Monitor `device`.
    #[must_use]
    pub fn new(name: impl Into<String>, device: Arc<dyn PowerSensor>) -> Self {
        Self {
            name: name.into(),
            device,
        }
    }

    /// The monitored device.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn PowerSensor> {
        &self.device
    }
}

impl DeviceMonitor for PowerMonitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self) {}

    fn is_healthy(&self) -> bool {
        true
    }

    fn fault_reasons(&self) -> &[String] {
        &[]
    }

    fn current_value(&self) -> String {
        match self.device.voltage() {
            Ok(volts) => volts.to_string(),
            Err(e) => format!("Voltage read failed: {e}"),
        }
    }

    fn device_type(&self) -> &str {
        self.device.model()
    }
}

impl fmt::Debug for PowerMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerMonitor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
