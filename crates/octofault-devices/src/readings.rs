//! Plain data returned by device reads.

use serde::{Deserialize, Serialize};

/// Quadrature encoder sample of a rotary actuator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EncoderSample {
    /// Accumulated encoder position in ticks.
    pub position: i64,
    /// Velocity in ticks per second.
    pub velocity: f64,
}

impl EncoderSample {
    /// Create a sample.
    #[must_use]
    pub const fn new(position: i64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

/// Angular velocity around the robot axes, degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularVelocity {
    /// Rotation rate around X.
    pub x: f64,
    /// Rotation rate around Y.
    pub y: f64,
    /// Rotation rate around Z.
    pub z: f64,
}

/// Robot orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Heading.
    pub yaw: f64,
    /// Nose up/down.
    pub pitch: f64,
    /// Side tilt.
    pub roll: f64,
}

impl Orientation {
    /// Create an orientation.
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// True if any axis is NaN.
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.yaw.is_nan() || self.pitch.is_nan() || self.roll.is_nan()
    }
}

/// Raw channel counts of a color sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorChannels {
    /// Red channel.
    pub red: f64,
    /// Green channel.
    pub green: f64,
    /// Blue channel.
    pub blue: f64,
    /// Clear/alpha channel.
    pub alpha: f64,
}

impl ColorChannels {
    /// Create a channel set.
    #[must_use]
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// All four channels, alpha last.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Sum of the three color channels (alpha excluded).
    #[must_use]
    pub fn rgb_sum(&self) -> f64 {
        self.red + self.green + self.blue
    }
}

/// Bus-level diagnostics exposed by high-fidelity I2C devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusStatus {
    /// Whether the bus client is armed for communication.
    pub armed: bool,
    /// 8-bit bus address, `None` if the driver has none.
    pub address: Option<u8>,
}

impl BusStatus {
    /// True if the address is present and non-zero.
    #[must_use]
    pub fn has_valid_address(&self) -> bool {
        matches!(self.address, Some(addr) if addr != 0)
    }
}
