//! Validation: construction-time keypoint checks and post-hoc constraint
//! reporting.
//!
//! ## What this module does
//! - [`validate_keypoints`] gates grid construction: at least two breakpoints,
//!   all finite, strictly ascending. Violations surface as typed
//!   [`CalibratorError`](crate::calibration::errors::CalibratorError) values.
//! - [`assert_constraints`] is a diagnostic, not a gate: it inspects a kernel
//!   against the configured monotonicity direction and output bounds and
//!   returns one human-readable message per violated constraint family, with
//!   an `eps` slack so floating-point noise from training does not trip it.
//!   An empty vector means the kernel is feasible. Message order is fixed:
//!   upper bound, lower bound, monotonicity.
//!
//! Constraint reporting reads derived keypoint outputs, so an "out of bounds"
//! finding refers to the function's value at some breakpoint, not to a raw
//! parameter in isolation.
use crate::calibration::{
    core::{config::Monotonicity, kernel::Kernel},
    errors::{CalibratorError, CalibratorResult},
};
use ndarray::ArrayView1;

/// Validate candidate breakpoint positions.
///
/// Checks, in order: at least two entries, every entry finite, strictly
/// ascending consecutive pairs. The first violation found is returned; for
/// ascending-order errors `index` names the later element of the offending
/// pair.
///
/// # Errors
/// - `CalibratorError::TooFewKeypoints`
/// - `CalibratorError::NonFiniteKeypoint`
/// - `CalibratorError::NonAscendingKeypoints`
pub fn validate_keypoints(positions: &ArrayView1<f64>) -> CalibratorResult<()> {
    if positions.len() < 2 {
        return Err(CalibratorError::TooFewKeypoints { count: positions.len() });
    }
    for (index, value) in positions.iter().enumerate() {
        if !value.is_finite() {
            return Err(CalibratorError::NonFiniteKeypoint { index, value: *value });
        }
    }
    for (i, pair) in positions.windows(2).into_iter().enumerate() {
        if pair[1] <= pair[0] {
            return Err(CalibratorError::NonAscendingKeypoints {
                index: i + 1,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// Report which configured constraints a kernel currently violates.
///
/// Checks the derived keypoint outputs against the bounds and the height
/// signs against the monotonicity direction, each with `eps` slack:
/// - an output above `output_max + eps` yields
///   `"Max weight greater than output_max."`;
/// - an output below `output_min - eps` yields
///   `"Min weight less than output_min."`;
/// - a height below `-eps` (`Increasing`) or above `eps` (`Decreasing`)
///   yields `"Monotonicity violated at: [(i, i+1), ...]."` listing the
///   offending keypoint-index pairs in ascending order.
///
/// Returns the messages in that fixed order; an empty vector means feasible.
pub fn assert_constraints(
    kernel: &Kernel, monotonicity: Option<Monotonicity>, output_min: Option<f64>,
    output_max: Option<f64>, eps: f64,
) -> Vec<String> {
    let mut messages = Vec::new();
    let outputs = kernel.keypoint_outputs();

    if let Some(max) = output_max {
        if outputs.iter().any(|output| *output > max + eps) {
            messages.push(String::from("Max weight greater than output_max."));
        }
    }
    if let Some(min) = output_min {
        if outputs.iter().any(|output| *output < min - eps) {
            messages.push(String::from("Min weight less than output_min."));
        }
    }
    if let Some(direction) = monotonicity {
        let violations: Vec<String> = kernel
            .heights
            .iter()
            .enumerate()
            .filter(|(_, height)| match direction {
                Monotonicity::Increasing => **height < -eps,
                Monotonicity::Decreasing => **height > eps,
            })
            .map(|(i, _)| format!("({}, {})", i, i + 1))
            .collect();
        if !violations.is_empty() {
            messages.push(format!("Monotonicity violated at: [{}].", violations.join(", ")));
        }
    }

    messages
}
