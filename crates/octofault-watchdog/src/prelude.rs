//! Prelude for octofault-watchdog.
//!
//! Also re-exports the monitor types needed to register monitors by hand.
//!
//! ```rust
//! use octofault_watchdog::prelude::*;
//! ```

pub use crate::config::{FaultManagerConfig, FaultManagerConfigBuilder};
pub use crate::dispatcher::{DeviceDispatcher, power_extension};
pub use crate::error::{WatchdogError, WatchdogResult};
pub use crate::manager::{FaultLine, FaultManager, TickReport};
pub use crate::octofault::Octofault;
pub use octofault_monitors::{
    DeviceMonitor, FaultAccumulation, Monitor, MonitorKind, MonitorSettings, Thresholds,
};
