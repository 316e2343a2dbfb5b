//! Device read errors.
//!
//! These are the only errors a device driver hands back to octofault. Monitors
//! convert them into ERROR fault reasons; they never escape a tick.

use thiserror::Error;

/// Failure while sampling a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Driver reported an error; the message is shown verbatim.
    #[error("{0}")]
    Driver(String),

    /// Device is no longer attached to the bus.
    #[error("Device disconnected")]
    Disconnected,

    /// Device did not answer in time.
    #[error("Device timeout after {after_ms}ms")]
    Timeout {
        /// How long the driver waited.
        after_ms: u64,
    },

    /// The requested reading is not supported by this device.
    #[error("Unsupported reading: {0}")]
    Unsupported(String),
}

impl DeviceError {
    /// Create a driver error from a message.
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(after_ms: u64) -> Self {
        Self::Timeout { after_ms }
    }

    /// Create an unsupported-reading error.
    #[must_use]
    pub fn unsupported(reading: impl Into<String>) -> Self {
        Self::Unsupported(reading.into())
    }
}

/// Result of a single device read.
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_message_is_verbatim() {
        assert_eq!(DeviceError::driver("bus timeout").to_string(), "bus timeout");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DeviceError::timeout(25).to_string(),
            "Device timeout after 25ms"
        );
        assert_eq!(DeviceError::Disconnected.to_string(), "Device disconnected");
        assert!(
            DeviceError::unsupported("velocity")
                .to_string()
                .contains("velocity")
        );
    }
}
