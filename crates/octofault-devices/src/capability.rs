//! Device capability traits.
//!
//! A physical device is reached through [`HardwareDevice`], which exposes one
//! probe per capability. A device may expose several capabilities (a color
//! sensor that also measures distance, for instance); the dispatcher decides
//! which one wins.
//!
//! All reads take `&self`. Drivers that need mutation use interior
//! mutability; octofault itself never writes to a device.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{DeviceError, DeviceResult};
use crate::readings::{AngularVelocity, BusStatus, ColorChannels, EncoderSample, Orientation};

/// Optional feedback available on a rotary actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotaryFeatures {
    /// Encoder position and velocity can be sampled.
    pub encoder: bool,
    /// A busy/active flag can be queried.
    pub busy_flag: bool,
    /// The drive-enable (PWM) status can be queried.
    pub drive_enable: bool,
}

/// Motor or continuous-rotation drive.
pub trait RotaryActuator: Send + Sync {
    /// Commanded power, nominally in `[-1.0, 1.0]`.
    fn power(&self) -> DeviceResult<f64>;

    /// Which optional readings this drive supports.
    fn features(&self) -> RotaryFeatures {
        RotaryFeatures::default()
    }

    /// Encoder sample. Only called when [`RotaryFeatures::encoder`] is set.
    fn encoder(&self) -> DeviceResult<EncoderSample> {
        Err(DeviceError::unsupported("encoder"))
    }

    /// Busy flag. Only called when [`RotaryFeatures::busy_flag`] is set.
    fn is_busy(&self) -> DeviceResult<bool> {
        Err(DeviceError::unsupported("busy flag"))
    }

    /// Drive-enable status. Only called when [`RotaryFeatures::drive_enable`] is set.
    fn drive_enabled(&self) -> DeviceResult<bool> {
        Err(DeviceError::unsupported("drive enable"))
    }

    /// Most specific model name, derived from the available feedback.
    fn model(&self) -> &'static str {
        let features = self.features();
        if features.encoder {
            "DcMotorEx"
        } else if features.busy_flag {
            "DcMotor"
        } else if features.drive_enable {
            "CRServoImplEx"
        } else {
            "CRServo"
        }
    }
}

/// Servo holding a commanded position in `[0.0, 1.0]`.
pub trait PositionalActuator: Send + Sync {
    /// Last commanded position.
    fn position(&self) -> DeviceResult<f64>;

    /// Whether the output signal is driven.
    fn drive_enabled(&self) -> DeviceResult<bool>;

    /// Model name.
    fn model(&self) -> &'static str {
        "Servo"
    }
}

/// Inertial measurement unit.
pub trait InertialSensor: Send + Sync {
    /// Angular velocity, `None` if the driver has no data.
    fn angular_velocity(&self) -> DeviceResult<Option<AngularVelocity>>;

    /// Orientation, `None` if the driver has no data.
    fn orientation(&self) -> DeviceResult<Option<Orientation>>;

    /// Model name.
    fn model(&self) -> &'static str {
        "IMU"
    }
}

/// Distance sensor.
pub trait RangingSensor: Send + Sync {
    /// Distance in centimeters.
    fn distance_cm(&self) -> DeviceResult<f64>;

    /// Model name.
    fn model(&self) -> &'static str {
        "Distance Sensor"
    }
}

/// Color sensor.
pub trait ChromaticSensor: Send + Sync {
    /// Raw channel counts.
    fn channels(&self) -> DeviceResult<ColorChannels>;

    /// Bus diagnostics, `None` for devices that do not expose them.
    fn bus_status(&self) -> Option<DeviceResult<BusStatus>> {
        None
    }

    /// Whether [`ChromaticSensor::bus_status`] is available.
    fn has_diagnostics(&self) -> bool {
        false
    }

    /// Model name.
    fn model(&self) -> &'static str {
        if self.has_diagnostics() {
            "RevColorSensorV3"
        } else {
            "ColorSensor"
        }
    }
}

/// Binary contact (touch) sensor.
pub trait ContactSensor: Send + Sync {
    /// Analog contact value, nominally in `[0.0, 1.0]`.
    fn value(&self) -> DeviceResult<f64>;

    /// Whether the contact is pressed.
    fn is_pressed(&self) -> DeviceResult<bool>;

    /// Model name.
    fn model(&self) -> &'static str {
        "Touch Sensor"
    }
}

/// Supply voltage sensor.
pub trait PowerSensor: Send + Sync {
    /// Voltage in volts.
    fn voltage(&self) -> DeviceResult<f64>;

    /// Model name.
    fn model(&self) -> &'static str {
        "Voltage Sensor"
    }
}

/// A physical device as handed out by the device registry.
///
/// Each probe returns the device viewed through one capability, or `None`.
/// Implementors override only the probes they support:
///
/// ```rust
/// use octofault_devices::prelude::*;
/// use std::sync::Arc;
///
/// struct Rangefinder;
///
/// impl RangingSensor for Rangefinder {
///     fn distance_cm(&self) -> DeviceResult<f64> {
///         Ok(42.0)
///     }
/// }
///
/// impl HardwareDevice for Rangefinder {
///     fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
///         Some(self)
///     }
/// }
///
/// let device: Arc<dyn HardwareDevice> = Arc::new(Rangefinder);
/// assert!(device.clone().as_ranging().is_some());
/// assert!(device.as_rotary().is_none());
/// ```
pub trait HardwareDevice: Send + Sync {
    /// View as a rotary actuator.
    fn as_rotary(self: Arc<Self>) -> Option<Arc<dyn RotaryActuator>> {
        None
    }

    /// View as a positional actuator.
    fn as_positional(self: Arc<Self>) -> Option<Arc<dyn PositionalActuator>> {
        None
    }

    /// View as an inertial sensor.
    fn as_inertial(self: Arc<Self>) -> Option<Arc<dyn InertialSensor>> {
        None
    }

    /// View as a ranging sensor.
    fn as_ranging(self: Arc<Self>) -> Option<Arc<dyn RangingSensor>> {
        None
    }

    /// View as a chromatic sensor.
    fn as_chromatic(self: Arc<Self>) -> Option<Arc<dyn ChromaticSensor>> {
        None
    }

    /// View as a contact sensor.
    fn as_contact(self: Arc<Self>) -> Option<Arc<dyn ContactSensor>> {
        None
    }

    /// View as a power sensor.
    fn as_power(self: Arc<Self>) -> Option<Arc<dyn PowerSensor>> {
        None
    }
}

/// Device category used for registry enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    /// Motors and continuous-rotation drives.
    Rotary,
    /// Servos.
    Positional,
    /// IMUs.
    Inertial,
    /// Distance sensors.
    Ranging,
    /// Color sensors.
    Chromatic,
    /// Touch sensors.
    Contact,
    /// Voltage sensors.
    Power,
    /// Every device.
    Any,
}

impl DeviceCategory {
    /// True if `device` exposes this category's capability.
    #[must_use]
    pub fn matches(self, device: &Arc<dyn HardwareDevice>) -> bool {
        let device = Arc::clone(device);
        match self {
            DeviceCategory::Rotary => device.as_rotary().is_some(),
            DeviceCategory::Positional => device.as_positional().is_some(),
            DeviceCategory::Inertial => device.as_inertial().is_some(),
            DeviceCategory::Ranging => device.as_ranging().is_some(),
            DeviceCategory::Chromatic => device.as_chromatic().is_some(),
            DeviceCategory::Contact => device.as_contact().is_some(),
            DeviceCategory::Power => device.as_power().is_some(),
            DeviceCategory::Any => true,
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCategory::Rotary => write!(f, "Rotary Actuator"),
            DeviceCategory::Positional => write!(f, "Positional Actuator"),
            DeviceCategory::Inertial => write!(f, "Inertial Sensor"),
            DeviceCategory::Ranging => write!(f, "Ranging Sensor"),
            DeviceCategory::Chromatic => write!(f, "Chromatic Sensor"),
            DeviceCategory::Contact => write!(f, "Contact Sensor"),
            DeviceCategory::Power => write!(f, "Power Sensor"),
            DeviceCategory::Any => write!(f, "Any Device"),
        }
    }
}
