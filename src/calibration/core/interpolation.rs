//! Forward evaluation for piecewise-linear calibrators: clamped
//! interpolation over a keypoint grid and kernel.
//!
//! ## What this module does
//! - Clamps each input into `[positions[0], positions[n-1]]`; inputs outside
//!   the grid evaluate as the nearest boundary breakpoint (no extrapolation).
//! - Locates the bracketing interval by binary search over the ascending
//!   positions (O(log n) per input).
//! - Linearly interpolates between the derived breakpoint outputs.
//! - Routes inputs exactly equal to the configured missing sentinel to the
//!   dedicated learned missing output, bypassing interpolation.
//!
//! ## Invariants (enforced upstream)
//! - `positions` is finite and strictly ascending with `n >= 2`.
//! - `kernel.heights.len() == positions.len() - 1` (asserted here; a
//!   mismatch is a logic bug, not a runtime error).
//!
//! ## Purity
//! Evaluation is a pure function of the current grid and kernel state; it
//! never mutates parameters. Constraint projection is a separate, explicitly
//! invoked operation.
use crate::calibration::core::kernel::Kernel;
use ndarray::{Array1, ArrayView1};

/// Sentinel input and its dedicated learned output.
///
/// Carried through [`calibrate`] when the calibrator is configured with a
/// `missing_input_value`; the output is a trainable scalar excluded from
/// monotonicity and bound projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingValue {
    /// Input value treated as "missing".
    pub input: f64,
    /// Learned output returned for missing inputs.
    pub output: f64,
}

/// Evaluate the calibrator on a batch of scalar inputs.
///
/// For each input: clamp to the grid range, find the interval `k` with
/// `positions[k] <= x <= positions[k+1]`, and return
/// `outputs[k] + heights[k] * (x - positions[k]) / (positions[k+1] - positions[k])`.
/// Inputs exactly equal to `missing.input` (when configured) return
/// `missing.output` instead.
///
/// # Inputs
/// - `positions`: current breakpoint positions (fixed, or recomputed from
///   segment logits by the caller for learned grids).
/// - `kernel`: bias and interval heights.
/// - `inputs`: batch of raw scalar inputs.
/// - `missing`: optional sentinel routing.
///
/// # Panics
/// - If `kernel.heights.len() + 1 != positions.len()`.
pub fn calibrate(
    positions: &ArrayView1<f64>, kernel: &Kernel, inputs: &ArrayView1<f64>,
    missing: Option<MissingValue>,
) -> Array1<f64> {
    assert_eq!(
        kernel.heights.len() + 1,
        positions.len(),
        "kernel heights must have one entry per keypoint interval"
    );
    let outputs = kernel.keypoint_outputs();
    inputs.mapv(|x| match missing {
        Some(MissingValue { input, output }) if x == input => output,
        _ => interpolate(positions, &outputs, &kernel.heights, x),
    })
}

/// Interpolate a single (non-missing) input.
fn interpolate(
    positions: &ArrayView1<f64>, outputs: &Array1<f64>, heights: &Array1<f64>, x: f64,
) -> f64 {
    let n = positions.len();
    let clamped = x.clamp(positions[0], positions[n - 1]);
    let k = bracket(positions, clamped);
    let width = positions[k + 1] - positions[k];
    outputs[k] + heights[k] * (clamped - positions[k]) / width
}

/// Largest interval index `k <= n - 2` with `positions[k] <= x`.
///
/// `x` must already be clamped into the grid range.
fn bracket(positions: &ArrayView1<f64>, x: f64) -> usize {
    let mut lo = 0;
    let mut hi = positions.len() - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if positions[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}
