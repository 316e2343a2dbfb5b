//! # octofault-devices
//!
//! The device side of octofault: what a monitored device can be asked, what
//! it answers, and how failures to answer are represented.
//!
//! ## Architecture
//!
//! - [`capability`] - one trait per device category plus the [`HardwareDevice`] probe trait
//! - [`readings`] - plain data returned by reads
//! - [`error`] - [`DeviceError`], the only failure a read can produce
//! - [`registry`] - the [`DeviceRegistry`] boundary to the host's device discovery
//! - [`clock`] - monotonic time for checks that span several ticks
//!
//! Octofault only ever reads devices. Nothing in this crate issues commands.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod capability;
pub mod clock;
pub mod error;
pub mod readings;
pub mod registry;

pub mod prelude;

pub use capability::{
    ChromaticSensor, ContactSensor, DeviceCategory, HardwareDevice, InertialSensor,
    PositionalActuator, PowerSensor, RangingSensor, RotaryActuator, RotaryFeatures,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DeviceError, DeviceResult};
pub use readings::{AngularVelocity, BusStatus, ColorChannels, EncoderSample, Orientation};
pub use registry::{DeviceRegistry, InMemoryDeviceRegistry, same_device};
