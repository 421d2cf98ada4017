//! models — user-facing piecewise-linear calibrator models.
//!
//! Purpose
//! -------
//! Collect the calibrator model APIs that downstream code (native Rust and
//! the Python bindings) interacts with. This layer sits on top of
//! `calibration::core`, wiring keypoint grids, kernels, and constraint
//! handling into cohesive model types.
//!
//! Key behaviors
//! -------------
//! - Expose [`NumericalCalibrator`], the single-feature piecewise-linear
//!   calibrator with optional monotonicity, output bounds, learned interior
//!   keypoints, and missing-sentinel handling.
//! - Route parameter updates through explicit trainable-state accessors
//!   (kernel, segment logits, missing output) so external training loops can
//!   mutate state without reaching into core internals.
//! - Keep constraint maintenance explicit: `apply_constraints` after every
//!   update, `assert_constraints` for diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed calibrator always pairs a validated grid of `n` keypoints
//!   with a kernel of `n - 1` heights; `set_kernel` enforces the pairing.
//! - Feasibility is guaranteed immediately after `apply_constraints` and may
//!   be broken by the external training loop in between; forward evaluation
//!   does not re-check it.
//! - Model instances are single-owner and not thread-safe; concurrent
//!   mutation of the same calibrator is not supported.
//!
//! Conventions
//! -----------
//! - Errors surface at construction as `CalibratorResult`; evaluation and
//!   projection are infallible, and panics indicate programming errors such
//!   as kernel/grid length mismatches.
//!
//! Downstream usage
//! ----------------
//! - Construct via `NumericalCalibrator::new` (fixed grid) or
//!   `NumericalCalibrator::with_learned_keypoints`, drive forward passes with
//!   `forward`, and call `apply_constraints` after each parameter update.
//! - Python bindings wrap [`NumericalCalibrator`] and convert errors at the
//!   PyO3 boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`numerical`] cover construction wiring, trainable-state
//!   accessors, and update-project-report cycles; numerical reference tables
//!   live in the core module tests, and full pipelines in the integration
//!   tests.

pub mod numerical;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::numerical::{NumericalCalibrator, DEFAULT_CONSTRAINT_EPS};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_calibration::calibration::models::prelude::*;
//
// to import the main calibrator model surface in a single line.

pub mod prelude {
    pub use super::numerical::NumericalCalibrator;
}
