//! calibration — piecewise-linear calibration stack: core numerics, models,
//! and errors.
//!
//! Purpose
//! -------
//! Provide a cohesive calibration layer that bundles keypoint grids, trainable
//! kernels, forward interpolation, constraint projection, model-level APIs,
//! and shared error types under a single namespace. This is the main entry
//! point for feature calibrators in the crate, and is the surface most
//! consumers (including the Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect core numerical and structural building blocks in [`core`]:
//!   configuration and constraint options, fixed and learned keypoint grids,
//!   the bias-plus-heights kernel with its initialization policies, clamped
//!   linear interpolation, constraint projection, and validation helpers.
//! - Expose the user-facing calibrator API in [`models`] via
//!   [`NumericalCalibrator`]: forward evaluation, explicit constraint
//!   projection, diagnostics, and trainable-state accessors.
//! - Centralize calibrator-specific error types in [`errors`]
//!   ([`CalibratorError`] and the [`CalibratorResult`] alias) so callers see a
//!   uniform error surface across the stack.
//! - Re-export the everyday types directly from this module and via
//!   [`prelude`] for ergonomic imports in downstream crates and bindings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Keypoint grids are validated at construction: at least two finite,
//!   strictly ascending breakpoints. Learned grids preserve ordering by
//!   construction through a softmax reparameterization of segment lengths.
//! - Kernels carry one height per keypoint interval; the model layer
//!   maintains the grid/kernel pairing.
//! - Constraint feasibility (monotone heights, bounded outputs) is restored
//!   by explicit projection after external parameter updates; it is not an
//!   invariant of the parameter types themselves.
//! - All numerics operate on finite `f64` `ndarray` containers; construction
//!   rejects non-finite configuration up front.
//! - Model instances are single-owner and not thread-safe.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based throughout. A grid of `n` keypoints has `n - 1`
//!   segments and heights; keypoint outputs are the running sums
//!   `bias + Σ heights[0..i]`.
//! - The calibration stack performs no I/O and no logging; callers
//!   orchestrate training and persistence. Error conditions surface as
//!   [`CalibratorResult`]; panics indicate programming errors such as shape
//!   mismatches.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Build a validated [`CalibratorOptions`] (direction, bounds, missing
//!      sentinel, initialization policy, projection budget).
//!   2. Construct a [`NumericalCalibrator`] over the input keypoints, fixed
//!      or learned.
//!   3. Evaluate batches with `forward`; between passes, let the training
//!      loop update the kernel (and logits / missing output), then call
//!      `apply_constraints`.
//!   4. Use `assert_constraints` as a post-training diagnostic.
//! - Python bindings import from this module (or its [`prelude`]) and rely
//!   on the `CalibratorError` conversion into `PyErr` defined in [`errors`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover option validation, grid construction and
//!   softmax seeding, kernel initialization, forward reference tables,
//!   projection reference tables, and validator message formats.
//! - Unit tests in [`models`] cover construction wiring, trainable-state
//!   accessors, and update-project-report cycles.
//! - Integration tests exercise full pipelines through the public
//!   [`NumericalCalibrator`] API.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------
//
// These are the “everyday” types most users need. More specialized items
// (individual projection passes, validation helpers, interpolation internals)
// remain under their respective submodules.

pub use self::core::{CalibratorOptions, Kernel, KernelInit, KeypointGrid, Monotonicity};

pub use self::errors::{CalibratorError, CalibratorResult};

pub use self::models::{NumericalCalibrator, DEFAULT_CONSTRAINT_EPS};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_calibration::calibration::prelude::*;
//
// to import the main calibration surface in a single line, without pulling in
// lower-level internals.

pub mod prelude {
    pub use super::{
        CalibratorError, CalibratorOptions, CalibratorResult, Kernel, KernelInit, KeypointGrid,
        Monotonicity, NumericalCalibrator,
    };
}
