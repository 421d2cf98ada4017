//! core — shared calibrator configuration, parameters, and numerics.
//!
//! Purpose
//! -------
//! Collect the building blocks of piecewise-linear calibrators: configuration
//! and constraint options, keypoint grids (fixed and learned), the trainable
//! kernel, forward interpolation, constraint projection, and validation
//! helpers. The model layer in `calibration::models` composes these
//! primitives into a user-facing calibrator.
//!
//! Key behaviors
//! -------------
//! - Define the constraint and initialization configuration
//!   ([`CalibratorOptions`], [`Monotonicity`], [`KernelInit`]) along with the
//!   default output range used when bounds are absent.
//! - Represent input breakpoints as a [`KeypointGrid`], either fixed at
//!   construction or reparameterized through trainable segment logits so
//!   interior breakpoints can move during training while staying ordered.
//! - Own the trainable bias-plus-heights parameters in [`Kernel`] and the
//!   two initialization policies (equal heights, equal slopes).
//! - Evaluate batches through clamped linear interpolation ([`calibrate`]),
//!   including missing-sentinel routing via [`MissingValue`].
//! - Restore feasibility after gradient updates through the projection
//!   sub-operations and the [`apply_constraints`] driver.
//! - Gate construction with [`validate_keypoints`] and report residual
//!   violations with [`assert_constraints`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Breakpoint positions handed to forward evaluation are finite and
//!   strictly ascending with at least two entries; grid constructors enforce
//!   this, and learned grids maintain it by construction through the softmax
//!   reparameterization.
//! - A kernel paired with a grid of `n` keypoints has exactly `n - 1`
//!   heights; the model layer maintains the pairing and free functions here
//!   assert the lengths they are handed.
//! - Feasibility (monotone heights, bounded outputs) is *not* an invariant of
//!   the kernel type. It holds immediately after [`apply_constraints`] and
//!   may be broken by the external training loop in between.
//! - All numerics operate on `f64` `ndarray` containers; no I/O and no
//!   logging happen in this module.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; `n` counts keypoints and `n - 1` counts segments
//!   and heights. Keypoint outputs are the running sums
//!   `bias + Σ heights[0..i]`.
//! - Errors are surfaced as `CalibratorResult` at construction; evaluation
//!   and projection are infallible and reserve panics for logic bugs such as
//!   kernel/grid length mismatches.
//!
//! Downstream usage
//! ----------------
//! - `calibration::models::NumericalCalibrator` is the intended consumer: it
//!   wires a grid, kernel, and options together and drives forward passes,
//!   projection, and reporting.
//! - Training loops mutate [`Kernel`] fields and learned-grid logits in
//!   place, then call [`apply_constraints`] after each update.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests cover option validation, grid construction and
//!   softmax seeding, kernel initialization against reference vectors,
//!   forward reference tables, the projection reference tables, and
//!   validator message formats. Model-level and integration tests exercise
//!   the composed pipeline.

pub mod config;
pub mod interpolation;
pub mod kernel;
pub mod keypoints;
pub mod projection;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{
    CalibratorOptions, KernelInit, Monotonicity, DEFAULT_OUTPUT_RANGE, DEFAULT_OUTPUT_SPAN,
    DEFAULT_PROJECTION_ITERATIONS,
};
pub use self::interpolation::{calibrate, MissingValue};
pub use self::kernel::Kernel;
pub use self::keypoints::KeypointGrid;
pub use self::projection::{
    apply_constraints, approximately_project_bounds_only, project_monotonic_bounds,
    project_monotonicity, squeeze_by_scaling,
};
pub use self::validation::{assert_constraints, validate_keypoints};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_calibration::calibration::core::prelude::*;
//
// to import the main calibrator core surface in a single line.

pub mod prelude {
    pub use super::config::{CalibratorOptions, KernelInit, Monotonicity};
    pub use super::interpolation::{calibrate, MissingValue};
    pub use super::kernel::Kernel;
    pub use super::keypoints::KeypointGrid;
    pub use super::projection::apply_constraints;
    pub use super::validation::{assert_constraints, validate_keypoints};
}
