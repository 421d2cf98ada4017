//! Numerical calibrator: a single-feature piecewise-linear model.
//!
//! This module composes the core primitives into the user-facing calibrator:
//! a keypoint grid (fixed or learned), a trainable kernel, and the configured
//! constraints. The calibrator owns its parameters; an external training loop
//! reads and writes them between forward passes and calls
//! [`NumericalCalibrator::apply_constraints`] after each update.
//!
//! Key ideas:
//! - Forward evaluation is pure: clamp, bracket, interpolate, with the
//!   missing sentinel routed to a dedicated learned output.
//! - Constraints are maintained by explicit projection, never inside the
//!   forward pass.
//! - Learned grids expose their segment logits as trainable state; positions
//!   are recomputed from the current logits at the start of every forward
//!   pass.
use crate::calibration::{
    core::{
        config::CalibratorOptions,
        interpolation::{calibrate, MissingValue},
        kernel::Kernel,
        keypoints::KeypointGrid,
        projection, validation,
    },
    errors::CalibratorResult,
};
use ndarray::{Array1, ArrayView1};

/// Default tolerance for [`NumericalCalibrator::assert_constraints`].
pub const DEFAULT_CONSTRAINT_EPS: f64 = 1e-6;

/// Piecewise-linear calibrator over a single scalar feature.
///
/// Holds the keypoint grid, the bias-plus-heights kernel, the constraint
/// configuration, and (when a missing sentinel is configured) the learned
/// missing output. Construction validates the grid and configuration; after
/// that, evaluation and projection are infallible.
///
/// # Notes
/// - Trainable state is the kernel, the learned-grid segment logits (if
///   any), and the missing output (if any). All are exposed mutably for an
///   external training loop.
/// - Feasibility holds right after [`NumericalCalibrator::apply_constraints`]
///   and is not re-checked on evaluation;
///   [`NumericalCalibrator::assert_constraints`] reports residual violations.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericalCalibrator {
    /// Input breakpoints, fixed or learned.
    pub grid: KeypointGrid,
    /// Trainable bias and interval heights.
    kernel: Kernel,
    /// Constraint and initialization configuration.
    pub options: CalibratorOptions,
    /// Learned output for the missing sentinel; `Some` iff
    /// `options.missing_input_value` is set.
    missing_output: Option<f64>,
}

impl NumericalCalibrator {
    /// Construct a calibrator with a fixed keypoint grid.
    ///
    /// # Arguments
    /// - `positions`: candidate breakpoints; at least two finite, strictly
    ///   ascending values.
    /// - `options`: validated constraint configuration.
    ///
    /// # Returns
    /// A calibrator whose kernel is initialized per `options.kernel_init`
    /// over the effective output range, and whose missing output starts at
    /// `0.0` when a missing sentinel is configured.
    ///
    /// # Errors
    /// - Grid validation errors from [`KeypointGrid::fixed`].
    pub fn new(
        positions: Array1<f64>, options: CalibratorOptions,
    ) -> CalibratorResult<NumericalCalibrator> {
        let grid = KeypointGrid::fixed(positions)?;
        Ok(NumericalCalibrator::assemble(grid, options))
    }

    /// Construct a calibrator whose interior breakpoints are learned.
    ///
    /// The endpoints of `positions` stay fixed; the initial spacing seeds
    /// the segment logits so the first forward pass sees the input grid
    /// unchanged. Everything else matches [`NumericalCalibrator::new`].
    ///
    /// # Errors
    /// - Grid validation errors from [`KeypointGrid::learned`].
    pub fn with_learned_keypoints(
        positions: Array1<f64>, options: CalibratorOptions,
    ) -> CalibratorResult<NumericalCalibrator> {
        let grid = KeypointGrid::learned(positions)?;
        Ok(NumericalCalibrator::assemble(grid, options))
    }

    fn assemble(grid: KeypointGrid, options: CalibratorOptions) -> NumericalCalibrator {
        let positions = grid.positions();
        let kernel = Kernel::init(&positions.view(), &options);
        let missing_output = options.missing_input_value.map(|_| 0.0);
        NumericalCalibrator { grid, kernel, options, missing_output }
    }

    /// Evaluate the calibrator on a batch of scalar inputs.
    ///
    /// Recomputes the breakpoint positions (a no-op copy for fixed grids,
    /// the softmax reparameterization for learned ones), then interpolates
    /// each input with clamping at the grid boundaries. Inputs equal to the
    /// configured missing sentinel return the learned missing output.
    pub fn forward(&self, inputs: &ArrayView1<f64>) -> Array1<f64> {
        let positions = self.grid.positions();
        let missing = match (self.options.missing_input_value, self.missing_output) {
            (Some(input), Some(output)) => Some(MissingValue { input, output }),
            _ => None,
        };
        calibrate(&positions.view(), &self.kernel, inputs, missing)
    }

    /// Project the kernel onto the configured feasible set.
    ///
    /// Call after every external parameter update. The missing output and
    /// the learned-grid logits are untouched: the missing output is not
    /// subject to monotonicity or bounds, and learned grids stay ordered by
    /// construction.
    pub fn apply_constraints(&mut self) {
        projection::apply_constraints(&mut self.kernel, &self.options);
    }

    /// Report which configured constraints the kernel currently violates.
    ///
    /// Returns one message per violated constraint family with `eps` slack;
    /// an empty vector means feasible. See
    /// [`validation::assert_constraints`] for message formats.
    pub fn assert_constraints(&self, eps: f64) -> Vec<String> {
        validation::assert_constraints(
            &self.kernel,
            self.options.monotonicity,
            self.options.output_min,
            self.options.output_max,
            eps,
        )
    }

    /// Current breakpoint positions, length `n`.
    pub fn keypoints_inputs(&self) -> Array1<f64> {
        self.grid.positions()
    }

    /// Current calibrator outputs at each breakpoint, length `n`.
    pub fn keypoints_outputs(&self) -> Array1<f64> {
        self.kernel.keypoint_outputs()
    }

    /// The trainable kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Mutable access to the trainable kernel.
    ///
    /// The training loop updates bias and heights in place; the heights
    /// length must be preserved (it is `Array1::assign` territory, not
    /// reallocation).
    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
    }

    /// Replace the kernel wholesale.
    ///
    /// # Panics
    /// - If `kernel.heights.len()` does not match the grid's segment count.
    pub fn set_kernel(&mut self, kernel: Kernel) {
        assert_eq!(
            kernel.num_heights(),
            self.grid.num_segments(),
            "kernel heights must have one entry per keypoint interval"
        );
        self.kernel = kernel;
    }

    /// Trainable segment logits, or `None` for a fixed grid.
    pub fn segment_logits(&self) -> Option<&Array1<f64>> {
        self.grid.segment_logits()
    }

    /// Mutable trainable segment logits, or `None` for a fixed grid.
    pub fn segment_logits_mut(&mut self) -> Option<&mut Array1<f64>> {
        self.grid.segment_logits_mut()
    }

    /// Learned output for the missing sentinel, if configured.
    pub fn missing_output(&self) -> Option<f64> {
        self.missing_output
    }

    /// Set the learned missing output.
    ///
    /// No-op when no missing sentinel is configured; the value would never
    /// be read.
    pub fn set_missing_output(&mut self, output: f64) {
        if self.options.missing_input_value.is_some() {
            self.missing_output = Some(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::core::config::{KernelInit, Monotonicity};
    use crate::calibration::errors::CalibratorError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction wiring: grid validation, kernel initialization, missing
    //   output seeding.
    // - Forward evaluation through the model surface, including learned
    //   grids and the missing sentinel.
    // - The projection and reporting passthroughs on realistic update
    //   cycles.
    // - Accessor contracts (`set_kernel` length check, logits exposure).
    //
    // They intentionally DO NOT cover:
    // - The numerical reference tables for interpolation, projection, and
    //   validation (core module tests).
    // -------------------------------------------------------------------------

    fn assert_close(actual: &Array1<f64>, expected: &Array1<f64>) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "expected {e}, got {a}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify default construction produces the equal-heights kernel over
    // the default output range and evaluates linearly.
    //
    // Given
    // -----
    // - Grid 1..5 with default options.
    //
    // Expect
    // ------
    // - Breakpoint outputs [-2, -1, 0, 1, 2]; midpoint inputs interpolate
    //   halfway.
    fn construction_initializes_default_kernel() {
        // Arrange
        let calibrator =
            NumericalCalibrator::new(Array1::linspace(1.0, 5.0, 5), CalibratorOptions::default())
                .unwrap();

        // Act
        let outputs = calibrator.forward(&array![1.0, 2.5, 5.0].view());

        // Assert
        assert_close(&calibrator.keypoints_outputs(), &array![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_close(&outputs, &array![-2.0, -0.5, 2.0]);
        assert_eq!(calibrator.missing_output(), None);
        assert_eq!(calibrator.segment_logits(), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify construction propagates grid validation errors.
    //
    // Given
    // -----
    // - A non-ascending breakpoint array.
    //
    // Expect
    // ------
    // - `NonAscendingKeypoints` from both constructors.
    fn construction_rejects_invalid_grids() {
        // Arrange
        let bad = array![0.0, 2.0, 1.0];

        // Act / Assert
        assert_eq!(
            NumericalCalibrator::new(bad.clone(), CalibratorOptions::default()).unwrap_err(),
            CalibratorError::NonAscendingKeypoints { index: 2, prev: 2.0, next: 1.0 }
        );
        assert_eq!(
            NumericalCalibrator::with_learned_keypoints(bad, CalibratorOptions::default())
                .unwrap_err(),
            CalibratorError::NonAscendingKeypoints { index: 2, prev: 2.0, next: 1.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify a configured missing sentinel seeds a learned output of 0.0
    // and routes through forward evaluation.
    //
    // Given
    // -----
    // - Grid [0, 1] with `missing_input_value = -1`.
    //
    // Expect
    // ------
    // - Sentinel inputs return 0.0 initially and the updated value after
    //   `set_missing_output`.
    fn missing_sentinel_is_seeded_and_trainable() {
        // Arrange
        let options = CalibratorOptions {
            missing_input_value: Some(-1.0),
            ..CalibratorOptions::default()
        };
        let mut calibrator = NumericalCalibrator::new(array![0.0, 1.0], options).unwrap();

        // Act / Assert
        assert_eq!(calibrator.missing_output(), Some(0.0));
        assert_eq!(calibrator.forward(&array![-1.0].view())[0], 0.0);

        calibrator.set_missing_output(0.7);
        assert_eq!(calibrator.forward(&array![-1.0].view())[0], 0.7);
    }

    #[test]
    // Purpose
    // -------
    // Verify a learned-keypoints calibrator reproduces its seed grid on the
    // first pass and tracks logit updates on the next.
    //
    // Given
    // -----
    // - Grid [0, 1, 4] with learned keypoints and default options.
    //
    // Expect
    // ------
    // - Initial positions match the seed; after zeroing the logits the
    //   interior breakpoint moves to the span midpoint and forward outputs
    //   move with it.
    fn learned_keypoints_track_logit_updates() {
        // Arrange
        let mut calibrator = NumericalCalibrator::with_learned_keypoints(
            array![0.0, 1.0, 4.0],
            CalibratorOptions::default(),
        )
        .unwrap();
        assert_close(&calibrator.keypoints_inputs(), &array![0.0, 1.0, 4.0]);

        // Act: equal logits make equal segments.
        calibrator
            .segment_logits_mut()
            .expect("learned grid exposes logits")
            .assign(&array![0.0, 0.0]);

        // Assert
        assert_close(&calibrator.keypoints_inputs(), &array![0.0, 2.0, 4.0]);
        // Default kernel is [-2, 2] over two segments; midpoint of the grid
        // now maps to the middle breakpoint output 0.
        assert_eq!(calibrator.forward(&array![2.0].view())[0], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify an update-project-report cycle restores and confirms
    // feasibility.
    //
    // Given
    // -----
    // - Increasing calibrator bounded to [0, 2] whose kernel is overwritten
    //   with an infeasible value.
    //
    // Expect
    // ------
    // - `assert_constraints` reports violations before projection and is
    //   silent after; forward outputs respect the bounds afterwards.
    fn projection_cycle_restores_feasibility() {
        // Arrange
        let options = CalibratorOptions::new(
            Some(Monotonicity::Increasing),
            Some(0.0),
            Some(2.0),
            None,
            KernelInit::EqualHeights,
            8,
        )
        .unwrap();
        let mut calibrator =
            NumericalCalibrator::new(Array1::linspace(0.0, 3.0, 4), options).unwrap();
        calibrator.set_kernel(Kernel::new(-1.0, array![4.0, -0.5, 1.0]));

        // Act
        let before = calibrator.assert_constraints(DEFAULT_CONSTRAINT_EPS);
        calibrator.apply_constraints();
        let after = calibrator.assert_constraints(DEFAULT_CONSTRAINT_EPS);

        // Assert
        assert!(!before.is_empty());
        assert!(after.is_empty());
        let outputs = calibrator.forward(&Array1::linspace(-1.0, 4.0, 11).view());
        for output in outputs.iter() {
            assert!(*output >= -1e-9 && *output <= 2.0 + 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify `set_kernel` rejects a heights length that does not match the
    // grid.
    //
    // Given
    // -----
    // - A 3-keypoint calibrator and a 3-height kernel.
    //
    // Expect
    // ------
    // - Panic with the interval message.
    #[should_panic(expected = "one entry per keypoint interval")]
    fn set_kernel_rejects_length_mismatch() {
        // Arrange
        let mut calibrator =
            NumericalCalibrator::new(array![0.0, 1.0, 2.0], CalibratorOptions::default()).unwrap();

        // Act
        calibrator.set_kernel(Kernel::new(0.0, array![1.0, 1.0, 1.0]));
    }
}
