//! Prelude for octofault-monitors.
//!
//! ```rust
//! use octofault_monitors::prelude::*;
//! ```

pub use crate::error::{MonitorError, MonitorResult};
pub use crate::health::{FaultAccumulation, HealthState};
pub use crate::monitor::{DeviceMonitor, Monitor, MonitorKind};
pub use crate::thresholds::{MonitorSettings, Thresholds};
pub use crate::{
    ChromaticMonitor, ContactMonitor, InertialMonitor, PositionalMonitor, PowerMonitor,
    RangingMonitor, RotaryMonitor,
};
