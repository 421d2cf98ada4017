//! Constraint projection: restoring kernel feasibility after gradient
//! updates.
//!
//! ## What this module does
//! After each optimizer step the kernel may leave the feasible set defined by
//! the configured monotonicity direction and output bounds. The sub-projections
//! here each project onto one convex constraint:
//! - [`project_monotonicity`] — exact Euclidean projection onto the
//!   monotonicity cone: wrong-signed heights are zeroed.
//! - [`project_monotonic_bounds`] — bound projection valid under a
//!   monotonicity direction. The near end (`bias`) is clamped directly; a
//!   far-end excess over the far bound is removed by subtracting a uniform
//!   amount from the kernel coordinates (the exact Euclidean projection onto
//!   the hyperplane `bias + Σ heights = far_bound`). When the near bound
//!   pins the bias, the uniform amount is spread over the heights alone.
//! - [`approximately_project_bounds_only`] — one-pass elementwise clamp of
//!   the cumulative output sequence, used when no monotonicity constraint
//!   needs reconciling. Cheap and approximate, not the nearest point.
//! - [`squeeze_by_scaling`] — rescales monotone heights so the far end lands
//!   exactly on a still-violated far bound; the exactness step closing out
//!   the alternating iteration.
//!
//! [`apply_constraints`] dispatches: a single active constraint family gets
//! its one-pass projection; monotonicity plus bounds alternates the cone and
//! hyperplane projections for the configured round budget (classic
//! alternating projection onto an intersection of convex sets), then finishes
//! with a final cone projection and the squeeze.
//!
//! ## Decreasing direction
//! Handled by mirroring: negate the kernel, swap and negate the bounds,
//! project in the increasing orientation, and mirror back.
//!
//! ## Mutation contract
//! All functions mutate `(bias, heights)` in place and never reallocate;
//! `heights.len()` is preserved. Projection is invoked explicitly by the
//! training loop, never from forward evaluation.
use crate::calibration::core::{
    config::{CalibratorOptions, Monotonicity},
    kernel::Kernel,
};
use ndarray::Array1;

/// Project heights onto the monotonicity cone.
///
/// `Increasing` zeroes negative heights; `Decreasing` zeroes positive ones.
/// This is the exact Euclidean projection onto the per-coordinate half-space
/// product.
pub fn project_monotonicity(heights: &mut Array1<f64>, monotonicity: Monotonicity) {
    match monotonicity {
        Monotonicity::Increasing => heights.mapv_inplace(|h| h.max(0.0)),
        Monotonicity::Decreasing => heights.mapv_inplace(|h| h.min(0.0)),
    }
}

/// Project `(bias, heights)` into the output bounds, assuming a monotone
/// height sequence.
///
/// Under monotonicity only the endpoints of the keypoint-output sequence can
/// violate the bounds: the first output (`bias`) against the near bound and
/// the last output against the far bound. The near end is clamped directly;
/// a far-end excess is removed by the uniform subtraction described in the
/// module docs. May reintroduce wrong-signed heights, which is why
/// [`apply_constraints`] alternates this projection with
/// [`project_monotonicity`].
pub fn project_monotonic_bounds(
    bias: &mut f64, heights: &mut Array1<f64>, monotonicity: Monotonicity,
    output_min: Option<f64>, output_max: Option<f64>,
) {
    match monotonicity {
        Monotonicity::Increasing => {
            project_increasing_bounds(bias, heights, output_min, output_max);
        }
        Monotonicity::Decreasing => {
            mirrored(bias, heights, output_min, output_max, project_increasing_bounds);
        }
    }
}

/// Approximately project `(bias, heights)` into the output bounds with no
/// monotonicity constraint.
///
/// Clamps every cumulative output into `[output_min, output_max]` (absent
/// bounds default to ±inf) and recovers the kernel by differencing. One
/// pass; sufficient when there is no monotonicity cone to reconcile against.
pub fn approximately_project_bounds_only(
    bias: &mut f64, heights: &mut Array1<f64>, output_min: Option<f64>, output_max: Option<f64>,
) {
    let lo = output_min.unwrap_or(f64::NEG_INFINITY);
    let hi = output_max.unwrap_or(f64::INFINITY);
    let mut previous = (*bias).clamp(lo, hi);
    let mut running = *bias;
    *bias = previous;
    for height in heights.iter_mut() {
        running += *height;
        let clamped = running.clamp(lo, hi);
        *height = clamped - previous;
        previous = clamped;
    }
}

/// Scale monotone heights so the far-end output lands exactly on a violated
/// far bound.
///
/// For `Increasing` the far bound is `output_max`; for `Decreasing` it is
/// `output_min` (via mirroring). The scaling factor
/// `(far_bound - bias) / (far_end - bias)` is clamped into `[0, 1]`, so the
/// heights keep their signs and the kernel never moves further from
/// feasibility. No-op when the relevant bound is absent or already
/// satisfied.
pub fn squeeze_by_scaling(
    bias: f64, heights: &mut Array1<f64>, monotonicity: Monotonicity, output_min: Option<f64>,
    output_max: Option<f64>,
) {
    match monotonicity {
        Monotonicity::Increasing => squeeze_increasing(bias, heights, output_max),
        Monotonicity::Decreasing => {
            heights.mapv_inplace(|h| -h);
            squeeze_increasing(-bias, heights, output_min.map(|b| -b));
            heights.mapv_inplace(|h| -h);
        }
    }
}

/// Project the kernel onto the feasible set configured in `options`.
///
/// Dispatch:
/// - no constraints → no-op;
/// - monotonicity only → one cone projection;
/// - bounds only → one approximate bound pass;
/// - both → `projection_iterations` rounds of {cone, monotone-bounds}
///   alternating projection, then a final cone projection and
///   [`squeeze_by_scaling`] so the result is feasible exactly rather than
///   only in the limit.
pub fn apply_constraints(kernel: &mut Kernel, options: &CalibratorOptions) {
    let has_bounds = options.has_output_bounds();
    match (options.monotonicity, has_bounds) {
        (None, false) => {}
        (Some(monotonicity), false) => project_monotonicity(&mut kernel.heights, monotonicity),
        (None, true) => approximately_project_bounds_only(
            &mut kernel.bias,
            &mut kernel.heights,
            options.output_min,
            options.output_max,
        ),
        (Some(monotonicity), true) => {
            for _ in 0..options.projection_iterations {
                project_monotonicity(&mut kernel.heights, monotonicity);
                project_monotonic_bounds(
                    &mut kernel.bias,
                    &mut kernel.heights,
                    monotonicity,
                    options.output_min,
                    options.output_max,
                );
            }
            project_monotonicity(&mut kernel.heights, monotonicity);
            squeeze_by_scaling(
                kernel.bias,
                &mut kernel.heights,
                monotonicity,
                options.output_min,
                options.output_max,
            );
        }
    }
}

// ---- Helper methods ----

/// Increasing-orientation bound projection; see [`project_monotonic_bounds`].
///
/// With both bounds present the bias is pinned into `[min, max]` and the
/// far-end excess is spread over the heights alone; with only the far bound
/// the excess is spread uniformly over bias and heights together (the exact
/// hyperplane projection).
fn project_increasing_bounds(
    bias: &mut f64, heights: &mut Array1<f64>, output_min: Option<f64>, output_max: Option<f64>,
) {
    if let Some(min) = output_min {
        *bias = bias.max(min);
    }
    if let Some(max) = output_max {
        if output_min.is_some() {
            *bias = bias.min(max);
        }
        let excess = *bias + heights.sum() - max;
        if excess > 0.0 {
            if output_min.is_some() {
                *heights -= excess / heights.len() as f64;
            } else {
                let delta = excess / (heights.len() + 1) as f64;
                *bias -= delta;
                *heights -= delta;
            }
        }
    }
}

/// Run an increasing-orientation projection on the mirrored kernel.
///
/// Mirroring negates bias and heights and swap-negates the bounds, so a
/// decreasing kernel becomes an increasing one with the same geometry.
fn mirrored(
    bias: &mut f64, heights: &mut Array1<f64>, output_min: Option<f64>, output_max: Option<f64>,
    project: fn(&mut f64, &mut Array1<f64>, Option<f64>, Option<f64>),
) {
    *bias = -*bias;
    heights.mapv_inplace(|h| -h);
    let mirrored_min = output_max.map(|b| -b);
    let mirrored_max = output_min.map(|b| -b);
    project(bias, heights, mirrored_min, mirrored_max);
    *bias = -*bias;
    heights.mapv_inplace(|h| -h);
}

/// Increasing-orientation squeeze; see [`squeeze_by_scaling`].
fn squeeze_increasing(bias: f64, heights: &mut Array1<f64>, output_max: Option<f64>) {
    if let Some(max) = output_max {
        let far_end = bias + heights.sum();
        if far_end > max && far_end > bias {
            let factor = ((max - bias) / (far_end - bias)).clamp(0.0, 1.0);
            *heights *= factor;
        }
    }
}
