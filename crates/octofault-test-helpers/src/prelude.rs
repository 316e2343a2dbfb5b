//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use octofault_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_parse, must_some, must_with};
pub use crate::{assert_approx_eq, assert_no_reason_contains, assert_reason_contains};

#[cfg(feature = "mock")]
pub use crate::mock::{
    MockColorRangeSensor, MockColorSensor, MockImu, MockMotor, MockRangefinder, MockServo,
    MockTouchSensor, MockVoltageSensor,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
