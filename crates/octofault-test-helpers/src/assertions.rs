//! Assertion macros for monitor tests.

/// Assert that two floating-point values are approximately equal.
///
/// ```rust
/// use octofault_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(1.0_f64, 1.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
}

/// Assert that some fault reason contains `needle`.
///
/// ```rust
/// use octofault_test_helpers::assert_reason_contains;
///
/// let reasons = vec!["WARNING: arm: Encoder not moving".to_string()];
/// assert_reason_contains!(reasons, "Encoder not moving");
/// ```
#[macro_export]
macro_rules! assert_reason_contains {
    ($reasons:expr, $needle:expr $(,)?) => {
        let reasons = &$reasons;
        let needle = $needle;
        if !reasons.iter().any(|reason| reason.contains(needle)) {
            panic!(
                "assertion failed: no fault reason contains {:?}\n  reasons: {:?}",
                needle, reasons
            );
        }
    };
}

/// Assert that no fault reason contains `needle`.
#[macro_export]
macro_rules! assert_no_reason_contains {
    ($reasons:expr, $needle:expr $(,)?) => {
        let reasons = &$reasons;
        let needle = $needle;
        if let Some(hit) = reasons.iter().find(|reason| reason.contains(needle)) {
            panic!(
                "assertion failed: unexpected fault reason containing {:?}\n  reason: {:?}",
                needle, hit
            );
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(0.3_f64, 0.1 + 0.2, 1e-9);
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn test_approx_eq_outside_tolerance() {
        assert_approx_eq!(1.0_f64, 1.1, 0.01);
    }

    #[test]
    fn test_reason_macros() {
        let reasons = ["ERROR: lift: PWM is not enabled".to_string()];
        assert_reason_contains!(reasons, "PWM");
        assert_no_reason_contains!(reasons, "stalled");
    }

    #[test]
    #[should_panic(expected = "no fault reason contains")]
    fn test_reason_contains_fails_on_empty() {
        let reasons: Vec<String> = Vec::new();
        assert_reason_contains!(reasons, "anything");
    }
}
