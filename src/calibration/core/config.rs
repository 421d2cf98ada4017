//! Calibrator configuration — monotonicity direction, kernel initialization
//! policy, and constraint settings.
//!
//! Purpose
//! -------
//! Collect the construction-time configuration for a piecewise-linear
//! calibrator in one place: the optional monotonicity direction, optional
//! output bounds, the missing-input sentinel, the kernel initialization
//! policy, and the alternating-projection round budget. Configuration is
//! validated once at construction and immutable thereafter, so the forward
//! and projection code can assume a consistent setup.
//!
//! Key behaviors
//! -------------
//! - Represent the monotonicity constraint as an explicit direction via
//!   [`Monotonicity`] (`Increasing` / `Decreasing`); absence of the
//!   constraint is `Option::None` at the [`CalibratorOptions`] level.
//! - Represent the kernel initialization policy via [`KernelInit`]
//!   (`EqualHeights` / `EqualSlopes`).
//! - Validate output bounds, the missing-input sentinel, and the projection
//!   round budget at construction, surfacing invalid configurations as typed
//!   errors (`CalibratorError`) instead of panicking.
//! - Derive the *effective* output range used by kernel initialization when
//!   bounds are partially or fully absent ([`CalibratorOptions::effective_output_range`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - When both bounds are present, `output_min <= output_max`.
//! - All supplied bounds and the missing-input sentinel are finite.
//! - `projection_iterations >= 1`.
//! - Successfully constructed options satisfy the above; downstream code does
//!   not re-validate.
//!
//! Conventions
//! -----------
//! - The default effective range when no bounds are given is
//!   [`DEFAULT_OUTPUT_RANGE`]; when exactly one bound is given the other is
//!   placed [`DEFAULT_OUTPUT_SPAN`] units away. These are conventions carried
//!   over from the reference system's observed behavior, exposed as public
//!   constants rather than hard-wired magic numbers.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`CalibratorOptions`] (or start from
//!   `CalibratorOptions::default()`) and pass it to
//!   `NumericalCalibrator::new`; the same options value drives kernel
//!   initialization, forward evaluation, projection, and validation.
//!
//! Testing notes
//! -------------
//! - Unit tests here verify defaulting, validation rejections, and the
//!   effective-range arithmetic. Behavior of the options inside forward /
//!   projection paths is covered by the respective module and integration
//!   tests.
use crate::calibration::errors::{CalibratorError, CalibratorResult};

/// Default symmetric output range used when neither bound is configured.
pub const DEFAULT_OUTPUT_RANGE: (f64, f64) = (-2.0, 2.0);

/// Default output-span width used to derive a missing bound from a present
/// one (present lower bound ⇒ upper at `min + DEFAULT_OUTPUT_SPAN`, and
/// symmetrically).
pub const DEFAULT_OUTPUT_SPAN: f64 = 4.0;

/// Default number of alternating-projection rounds.
pub const DEFAULT_PROJECTION_ITERATIONS: usize = 8;

/// Monotonicity — direction constraint for a calibrator's output.
///
/// `Increasing` requires every interval height to be non-negative;
/// `Decreasing` requires every height to be non-positive. The unconstrained
/// case is represented as `None` in [`CalibratorOptions::monotonicity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    /// Calibrator output must be non-decreasing in its input.
    Increasing,
    /// Calibrator output must be non-increasing in its input.
    Decreasing,
}

/// KernelInit — initialization policy for the calibrator kernel.
///
/// Both policies place the calibrator's endpoints on the effective output
/// bounds (see [`CalibratorOptions::effective_output_range`]); they differ in
/// how the span is distributed across intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelInit {
    /// Each interval receives an equal share of the output span.
    EqualHeights,
    /// Heights are proportional to the interval widths, so the initial
    /// function is exactly linear across the full input range.
    EqualSlopes,
}

/// CalibratorOptions — immutable construction-time configuration for a
/// piecewise-linear calibrator.
///
/// Purpose
/// -------
/// Bundle the monotonicity direction, output bounds, missing-input sentinel,
/// kernel initialization policy, and projection round budget, validated once
/// at construction.
///
/// Fields
/// ------
/// - `monotonicity`: `Option<Monotonicity>`
///   Direction constraint; `None` leaves the shape unconstrained.
/// - `output_min` / `output_max`: `Option<f64>`
///   Optional output bounds. Finite; `min <= max` when both are present.
/// - `missing_input_value`: `Option<f64>`
///   Sentinel input that bypasses interpolation and maps to a dedicated
///   learned output. Finite when present.
/// - `kernel_init`: [`KernelInit`]
///   Initialization policy for the kernel.
/// - `projection_iterations`: `usize`
///   Alternating-projection round budget when monotonicity and bounds are
///   jointly active. At least 1.
///
/// Invariants
/// ----------
/// - Enforced by [`CalibratorOptions::new`]; see module docs.
///
/// Notes
/// -----
/// - The struct is small and `Clone`/`PartialEq`; public APIs accept a
///   `CalibratorOptions` rather than a list of loose parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratorOptions {
    /// Optional monotonicity direction.
    pub monotonicity: Option<Monotonicity>,
    /// Optional lower output bound.
    pub output_min: Option<f64>,
    /// Optional upper output bound.
    pub output_max: Option<f64>,
    /// Optional sentinel input routed to the learned missing output.
    pub missing_input_value: Option<f64>,
    /// Kernel initialization policy.
    pub kernel_init: KernelInit,
    /// Alternating-projection round budget.
    pub projection_iterations: usize,
}

impl Default for CalibratorOptions {
    fn default() -> CalibratorOptions {
        CalibratorOptions {
            monotonicity: None,
            output_min: None,
            output_max: None,
            missing_input_value: None,
            kernel_init: KernelInit::EqualHeights,
            projection_iterations: DEFAULT_PROJECTION_ITERATIONS,
        }
    }
}

impl CalibratorOptions {
    /// Construct validated calibrator options.
    ///
    /// Parameters
    /// ----------
    /// - `monotonicity`: `Option<Monotonicity>`
    ///   Direction constraint, or `None` for an unconstrained shape.
    /// - `output_min`: `Option<f64>`
    ///   Optional lower output bound; must be finite when present.
    /// - `output_max`: `Option<f64>`
    ///   Optional upper output bound; must be finite when present and at
    ///   least `output_min` when both are given.
    /// - `missing_input_value`: `Option<f64>`
    ///   Optional sentinel input; must be finite when present.
    /// - `kernel_init`: `KernelInit`
    ///   Kernel initialization policy.
    /// - `projection_iterations`: `usize`
    ///   Alternating-projection round budget; must be at least 1.
    ///
    /// Returns
    /// -------
    /// `CalibratorResult<CalibratorOptions>`
    ///   - `Ok(options)` when all fields validate.
    ///   - `Err(CalibratorError)` otherwise.
    ///
    /// Errors
    /// ------
    /// - `CalibratorError::NonFiniteOutputBound` for a NaN/±inf bound.
    /// - `CalibratorError::InvalidOutputBounds` when `output_min > output_max`.
    /// - `CalibratorError::NonFiniteMissingValue` for a NaN/±inf sentinel.
    /// - `CalibratorError::InvalidProjectionIterations` for a zero budget.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_calibration::calibration::core::config::{
    /// #     CalibratorOptions, KernelInit, Monotonicity,
    /// # };
    /// let options = CalibratorOptions::new(
    ///     Some(Monotonicity::Increasing),
    ///     Some(0.0),
    ///     Some(1.0),
    ///     None,
    ///     KernelInit::EqualHeights,
    ///     8,
    /// )
    /// .unwrap();
    /// assert_eq!(options.effective_output_range(), (0.0, 1.0));
    /// ```
    pub fn new(
        monotonicity: Option<Monotonicity>, output_min: Option<f64>, output_max: Option<f64>,
        missing_input_value: Option<f64>, kernel_init: KernelInit, projection_iterations: usize,
    ) -> CalibratorResult<CalibratorOptions> {
        for bound in [output_min, output_max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(CalibratorError::NonFiniteOutputBound { value: bound });
            }
        }
        if let (Some(min), Some(max)) = (output_min, output_max) {
            if min > max {
                return Err(CalibratorError::InvalidOutputBounds { min, max });
            }
        }
        if let Some(value) = missing_input_value {
            if !value.is_finite() {
                return Err(CalibratorError::NonFiniteMissingValue { value });
            }
        }
        if projection_iterations == 0 {
            return Err(CalibratorError::InvalidProjectionIterations {
                value: projection_iterations,
            });
        }
        Ok(CalibratorOptions {
            monotonicity,
            output_min,
            output_max,
            missing_input_value,
            kernel_init,
            projection_iterations,
        })
    }

    /// Effective `(lo, hi)` output range used by kernel initialization.
    ///
    /// - Both bounds present: `(output_min, output_max)`.
    /// - Only `output_min`: `(output_min, output_min + DEFAULT_OUTPUT_SPAN)`.
    /// - Only `output_max`: `(output_max - DEFAULT_OUTPUT_SPAN, output_max)`.
    /// - Neither: [`DEFAULT_OUTPUT_RANGE`].
    pub fn effective_output_range(&self) -> (f64, f64) {
        match (self.output_min, self.output_max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, min + DEFAULT_OUTPUT_SPAN),
            (None, Some(max)) => (max - DEFAULT_OUTPUT_SPAN, max),
            (None, None) => DEFAULT_OUTPUT_RANGE,
        }
    }

    /// Whether at least one output bound is configured.
    pub fn has_output_bounds(&self) -> bool {
        self.output_min.is_some() || self.output_max.is_some()
    }
}
