//! Error types for fixation classification.

use thiserror::Error;

/// Errors produced by the classification core.
///
/// All of these are validation failures detected before any computation
/// begins. No partial result is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixationError {
    /// Two sequences that must line up sample-for-sample do not.
    #[error("length mismatch: {left_name} has {left} samples, {right_name} has {right}")]
    LengthMismatch {
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    },

    /// A numeric parameter is out of its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A combination mode name or legacy code is not recognised.
    #[error("invalid algorithm mode `{0}` (use and, or, ivt, idt or 0-3)")]
    InvalidMode(String),

    /// A gaze coordinate is NaN or infinite.
    #[error("non-finite {axis} coordinate at sample {index}")]
    NonFiniteSample { axis: &'static str, index: usize },

    /// A stored fixation boundary does not split two fixation samples.
    #[error("invalid fixation boundary at sample {index}: {reason}")]
    InvalidBoundary { index: usize, reason: &'static str },
}

impl FixationError {
    pub(crate) fn length_mismatch(
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    ) -> Self {
        FixationError::LengthMismatch {
            left_name,
            left,
            right_name,
            right,
        }
    }
}

/// Require `value` to be finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, FixationError> {
    if !value.is_finite() {
        return Err(FixationError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(FixationError::InvalidParameter {
            name,
            value,
            reason: "must be greater than zero",
        });
    }
    Ok(value)
}

/// Require `value` to be finite and not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64, FixationError> {
    if !value.is_finite() {
        return Err(FixationError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(FixationError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("t", 0.5), Ok(0.5));
        assert!(require_positive("t", 0.0).is_err());
        assert!(require_positive("t", -1.0).is_err());
        assert!(require_positive("t", f64::NAN).is_err());
        assert!(require_positive("t", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("d", 0.0), Ok(0.0));
        assert!(require_non_negative("d", -0.01).is_err());
        assert!(require_non_negative("d", f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = FixationError::length_mismatch("x", 3, "y", 2);
        assert_eq!(
            err.to_string(),
            "length mismatch: x has 3 samples, y has 2"
        );

        let err = FixationError::InvalidMode("7".to_string());
        assert!(err.to_string().contains("`7`"));
    }
}
