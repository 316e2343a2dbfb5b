//! Prelude for octofault-devices.
//!
//! ```rust
//! use octofault_devices::prelude::*;
//! ```

pub use crate::capability::{
    ChromaticSensor, ContactSensor, DeviceCategory, HardwareDevice, InertialSensor,
    PositionalActuator, PowerSensor, RangingSensor, RotaryActuator, RotaryFeatures,
};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{DeviceError, DeviceResult};
pub use crate::readings::{AngularVelocity, BusStatus, ColorChannels, EncoderSample, Orientation};
pub use crate::registry::{DeviceRegistry, InMemoryDeviceRegistry, same_device};
