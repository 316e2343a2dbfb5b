//! # octofault-watchdog
//!
//! The tick-driven half of octofault: a [`FaultManager`] that owns every
//! monitor and polls them once per tick, a [`DeviceDispatcher`] that turns
//! discovered devices into monitors, and the [`Octofault`] facade tying both
//! to a device registry.
//!
//! ## Architecture
//!
//! - [`manager`] - name-keyed monitor registry, tick pass and fault lines
//! - [`dispatcher`] - ordered capability probing and the extension hook
//! - [`octofault`] - host-facing facade
//! - [`config`] - [`FaultManagerConfig`], loadable from YAML or JSON
//! - [`error`] - [`WatchdogError`]
//!
//! A tick never fails. Device read errors are turned into fault reasons by
//! the monitors, and the manager only reports them.
//!
//! ## Example
//!
//! ```rust
//! use octofault_devices::prelude::*;
//! use octofault_telemetry::prelude::*;
//! use octofault_watchdog::prelude::*;
//! use std::sync::Arc;
//!
//! struct Rangefinder(f64);
//!
//! impl RangingSensor for Rangefinder {
//!     fn distance_cm(&self) -> DeviceResult<f64> {
//!         Ok(self.0)
//!     }
//! }
//!
//! impl HardwareDevice for Rangefinder {
//!     fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
//!         Some(self)
//!     }
//! }
//!
//! let registry = InMemoryDeviceRegistry::new()
//!     .with("front", Arc::new(Rangefinder(50.0)))
//!     .with("rear", Arc::new(Rangefinder(-5.0)));
//! let sink = Arc::new(MemorySink::new());
//!
//! let mut octofault = Octofault::new(registry, sink.clone());
//! let report = octofault.tick();
//!
//! assert_eq!(report.faulty_names(), vec!["rear"]);
//! assert!(sink.contains("rear is faulty: [WARNING: rear: Invalid distance reading: -5.0]"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod octofault;

pub mod prelude;

pub use config::{FaultManagerConfig, FaultManagerConfigBuilder};
pub use dispatcher::{DeviceDispatcher, ExtensionHook, PROBE_ORDER, power_extension};
pub use error::{WatchdogError, WatchdogResult};
pub use manager::{FaultLine, FaultManager, TickReport};
pub use octofault::Octofault;
