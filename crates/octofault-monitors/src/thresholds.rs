//! Fault detection thresholds.
//!
//! Every comparison against these values is strict: a reading exactly on a
//! threshold is not a fault.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MonitorError, MonitorResult};
use crate::health::FaultAccumulation;

/// Numeric limits used by the category monitors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// |power| above which a rotary actuator is expected to move.
    pub motion_power: f64,
    /// How long an encoder may report the same position under power.
    pub stall_window_ms: u64,
    /// |velocity| below which a powered, encoded drive is considered stalling.
    pub min_velocity: f64,
    /// |power| below which a busy drive is suspicious.
    pub busy_min_power: f64,
    /// |power| above which an open-loop drive is flagged for lack of feedback.
    pub open_loop_power: f64,
    /// Lowest valid servo position.
    pub servo_min: f64,
    /// Highest valid servo position.
    pub servo_max: f64,
    /// Largest plausible distance reading in centimeters.
    pub max_distance_cm: f64,
    /// Largest allowed difference between two normalized color shares.
    pub white_balance_tolerance: f64,
    /// Lowest valid contact value.
    pub contact_min: f64,
    /// Highest valid contact value.
    pub contact_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            motion_power: 0.05,
            stall_window_ms: 300,
            min_velocity: 5.0,
            busy_min_power: 0.15,
            open_loop_power: 0.5,
            servo_min: 0.0,
            servo_max: 1.0,
            max_distance_cm: 1000.0,
            white_balance_tolerance: 0.2,
            contact_min: 0.0,
            contact_max: 1.0,
        }
    }
}

impl Thresholds {
    /// Stall window as a [`Duration`].
    #[must_use]
    pub fn stall_window(&self) -> Duration {
        Duration::from_millis(self.stall_window_ms)
    }

    /// Validate the thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not finite, negative where a magnitude
    /// is expected, or if a range is empty.
    pub fn validate(&self) -> MonitorResult<()> {
        let magnitudes = [
            ("motion_power", self.motion_power),
            ("min_velocity", self.min_velocity),
            ("busy_min_power", self.busy_min_power),
            ("open_loop_power", self.open_loop_power),
            ("max_distance_cm", self.max_distance_cm),
            ("white_balance_tolerance", self.white_balance_tolerance),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(MonitorError::invalid_threshold(
                    name,
                    format!("must be a finite, non-negative number (got {value})"),
                ));
            }
        }

        if self.stall_window_ms == 0 {
            return Err(MonitorError::invalid_threshold(
                "stall_window_ms",
                "must be greater than 0",
            ));
        }

        check_range("servo", self.servo_min, self.servo_max)?;
        check_range("contact", self.contact_min, self.contact_max)?;
        Ok(())
    }
}

fn check_range(name: &'static str, min: f64, max: f64) -> MonitorResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(MonitorError::invalid_threshold(
            name,
            format!("range [{min}, {max}] is not a valid finite range"),
        ));
    }
    Ok(())
}

/// Settings the registry pushes into every built-in monitor it owns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Fault reason accumulation policy.
    pub accumulation: FaultAccumulation,
    /// Detection thresholds.
    pub thresholds: Thresholds,
}

impl MonitorSettings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are invalid.
    pub fn validate(&self) -> MonitorResult<()> {
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let thresholds = Thresholds::default();
        assert!(thresholds.validate().is_ok());
        assert_eq!(thresholds.stall_window(), Duration::from_millis(300));
    }

    #[test]
    fn test_rejects_negative_magnitude() {
        let thresholds = Thresholds {
            motion_power: -0.1,
            ..Thresholds::default()
        };
        assert!(matches!(
            thresholds.validate(),
            Err(MonitorError::InvalidThreshold {
                name: "motion_power",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_and_empty_ranges() {
        let nan = Thresholds {
            white_balance_tolerance: f64::NAN,
            ..Thresholds::default()
        };
        assert!(nan.validate().is_err());

        let inverted = Thresholds {
            servo_min: 1.0,
            servo_max: 0.0,
            ..Thresholds::default()
        };
        assert!(inverted.validate().is_err());

        let zero_window = Thresholds {
            stall_window_ms: 0,
            ..Thresholds::default()
        };
        assert!(zero_window.validate().is_err());
    }

    #[test]
    fn test_settings_default_policy() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.accumulation, FaultAccumulation::ClearEachTick);
        assert!(settings.validate().is_ok());
    }
}
