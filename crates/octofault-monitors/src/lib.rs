//! # octofault-monitors
//!
//! Per-device fault detection state machines.
//!
//! A monitor owns a shared handle to one device and, once per tick, reads it
//! and decides whether it is healthy. Read failures never escape a monitor;
//! they become ERROR fault reasons.
//!
//! ## Architecture
//!
//! - [`monitor`] - the [`DeviceMonitor`] contract and the closed [`Monitor`] variant set
//! - [`health`] - [`HealthState`] and the [`FaultAccumulation`] policy
//! - [`thresholds`] - tunable limits shared by the category monitors
//! - one module per device category: [`rotary`], [`positional`], [`inertial`],
//!   [`ranging`], [`chromatic`], [`contact`], [`power`]
//!
//! ## Example
//!
//! ```rust
//! use octofault_devices::prelude::*;
//! use octofault_monitors::prelude::*;
//! use std::sync::Arc;
//!
//! struct Rangefinder;
//!
//! impl RangingSensor for Rangefinder {
//!     fn distance_cm(&self) -> DeviceResult<f64> {
//!         Ok(-5.0)
//!     }
//! }
//!
//! let mut monitor = Monitor::ranging("front", Arc::new(Rangefinder));
//! monitor.update();
//! assert!(!monitor.is_healthy());
//! assert_eq!(
//!     monitor.fault_reasons(),
//!     ["WARNING: front: Invalid distance reading: -5.0".to_string()]
//! );
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chromatic;
pub mod contact;
pub mod error;
pub mod health;
pub mod inertial;
pub mod monitor;
pub mod positional;
pub mod power;
pub mod ranging;
pub mod rotary;
pub mod thresholds;

pub mod prelude;

pub use chromatic::ChromaticMonitor;
pub use contact::ContactMonitor;
pub use error::{MonitorError, MonitorResult};
pub use health::{FaultAccumulation, HealthState};
pub use inertial::InertialMonitor;
pub use monitor::{DeviceMonitor, Monitor, MonitorKind};
pub use positional::PositionalMonitor;
pub use power::PowerMonitor;
pub use ranging::RangingMonitor;
pub use rotary::RotaryMonitor;
pub use thresholds::{MonitorSettings, Thresholds};
