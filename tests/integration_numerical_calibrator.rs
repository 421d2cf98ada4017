//! Integration tests for piecewise-linear numerical calibrators.
//!
//! Purpose
//! -------
//! - Validate the end-to-end calibrator pipeline: from validated options and
//!   keypoints, through kernel initialization and forward evaluation, to
//!   training-style parameter updates, constraint projection, and
//!   diagnostics.
//! - Exercise realistic configurations (both monotonicity directions,
//!   partial and full bounds, learned keypoints, missing sentinels) rather
//!   than toy edge cases only.
//!
//! Coverage
//! --------
//! - `calibration::core`:
//!   - `CalibratorOptions` construction for constrained configurations.
//!   - Fixed and learned `KeypointGrid` behavior through the model surface.
//! - `calibration::models::numerical::NumericalCalibrator`:
//!   - Construction, forward evaluation, projection, and constraint
//!     reporting across configuration grids.
//!
//! Exclusions
//! ----------
//! - Fine-grained reference tables for interpolation, projection
//!   sub-operations, and validator messages — these are covered by unit
//!   tests.
//! - Python bindings and user-facing API wrappers — those are expected to
//!   be tested at a higher integration or system level.
//! - Exhaustive stress testing over extreme grid sizes — those belong in
//!   targeted performance and property tests.
use ndarray::{array, Array1};
use rust_calibration::calibration::{
    core::config::{CalibratorOptions, KernelInit, Monotonicity},
    core::kernel::Kernel,
    models::numerical::{NumericalCalibrator, DEFAULT_CONSTRAINT_EPS},
};

/// Purpose
/// -------
/// Build validated calibrator options for the given constraint
/// configuration, treating construction failure as a test configuration
/// error.
///
/// Parameters
/// ----------
/// - `monotonicity`: Optional direction constraint.
/// - `output_min` / `output_max`: Optional finite bounds with `min <= max`.
/// - `kernel_init`: Initialization policy for the kernel.
///
/// Returns
/// -------
/// - A `CalibratorOptions` instance with no missing sentinel and the
///   default projection round budget.
///
/// Invariants
/// ----------
/// - Panics if `CalibratorOptions::new` rejects the supplied configuration;
///   all call sites pass statically valid values.
fn make_options(
    monotonicity: Option<Monotonicity>, output_min: Option<f64>, output_max: Option<f64>,
    kernel_init: KernelInit,
) -> CalibratorOptions {
    CalibratorOptions::new(monotonicity, output_min, output_max, None, kernel_init, 8)
        .expect("CalibratorOptions::new should accept valid test configurations")
}

/// Purpose
/// -------
/// Simulate one training-style parameter update: overwrite the kernel with
/// the supplied values and restore feasibility via projection, the sequence
/// an external optimizer runs after every gradient step.
///
/// Parameters
/// ----------
/// - `calibrator`: Model under test; its grid must have
///   `heights.len() + 1` keypoints.
/// - `bias` / `heights`: New kernel values, typically infeasible.
///
/// Invariants
/// ----------
/// - Panics if the heights length does not match the grid (via
///   `set_kernel`); that indicates a test bug, not behavior under test.
fn update_and_project(calibrator: &mut NumericalCalibrator, bias: f64, heights: Array1<f64>) {
    calibrator.set_kernel(Kernel::new(bias, heights));
    calibrator.apply_constraints();
}

#[test]
// Purpose
// -------
// Ensure the calibrator public API supports construction, forward
// evaluation, infeasible updates, projection, and diagnostics across a
// grid of constraint configurations without panicking and with sane
// outputs.
//
// Given
// -----
// - A 5-keypoint grid on [0, 4] and a batch of inputs spanning beyond the
//   grid on both sides.
// - Configurations covering: both directions, min-only, max-only, both
//   bounds, and both kernel initialization policies.
// - An adversarial kernel update with mixed-sign heights and out-of-range
//   endpoints.
//
// Expect
// ------
// - Construction succeeds and the freshly initialized kernel is feasible
//   (no constraint messages).
// - After the adversarial update plus projection, `assert_constraints`
//   returns no messages and all forward outputs respect the configured
//   bounds with monotone ordering along the grid where a direction is
//   configured.
fn calibrator_api_supports_constraint_configuration_grid() {
    let configurations: &[(Option<Monotonicity>, Option<f64>, Option<f64>)] = &[
        (Some(Monotonicity::Increasing), None, Some(1.0)),
        (Some(Monotonicity::Increasing), Some(-1.0), Some(1.0)),
        (Some(Monotonicity::Decreasing), Some(-1.0), None),
        (Some(Monotonicity::Decreasing), Some(-1.0), Some(1.0)),
        (None, Some(-1.0), Some(1.0)),
    ];
    let inits = [KernelInit::EqualHeights, KernelInit::EqualSlopes];
    let inputs = Array1::linspace(-1.0, 5.0, 25);

    for &(monotonicity, output_min, output_max) in configurations {
        for init in inits {
            let options = make_options(monotonicity, output_min, output_max, init);
            let mut calibrator =
                NumericalCalibrator::new(Array1::linspace(0.0, 4.0, 5), options)
                    .expect("construction should succeed on a valid grid");

            // Fresh kernels start feasible.
            assert!(calibrator.assert_constraints(DEFAULT_CONSTRAINT_EPS).is_empty());

            update_and_project(&mut calibrator, 2.0, array![-1.5, 3.0, -0.25, 1.0]);

            assert!(
                calibrator.assert_constraints(DEFAULT_CONSTRAINT_EPS).is_empty(),
                "projection should restore feasibility for {monotonicity:?}, \
                 bounds ({output_min:?}, {output_max:?})"
            );

            let outputs = calibrator.forward(&inputs.view());
            for output in outputs.iter() {
                if let Some(min) = output_min {
                    assert!(*output >= min - 1e-9);
                }
                if let Some(max) = output_max {
                    assert!(*output <= max + 1e-9);
                }
            }
            // Outputs along increasing inputs follow the configured direction.
            if let Some(direction) = monotonicity {
                for pair in outputs.to_vec().windows(2) {
                    match direction {
                        Monotonicity::Increasing => assert!(pair[1] >= pair[0] - 1e-9),
                        Monotonicity::Decreasing => assert!(pair[1] <= pair[0] + 1e-9),
                    }
                }
            }
        }
    }
}

#[test]
// Purpose
// -------
// Verify the documented projection outcome for an increasing calibrator
// with an upper bound, end to end through the model surface.
//
// Given
// -----
// - Grid [1, 2, 3, 4], `Increasing`, `output_max = 5`.
// - A kernel update to bias 3 with heights [1, 2, 2] (far end 8).
//
// Expect
// ------
// - After projection the kernel is bias 2.25 with heights
//   [0.25, 1.25, 1.25]; the last keypoint output is exactly 5 and forward
//   evaluation past the grid clamps to it.
fn projection_outcome_matches_reference_for_bounded_increasing() {
    // Arrange
    let options =
        make_options(Some(Monotonicity::Increasing), None, Some(5.0), KernelInit::EqualHeights);
    let mut calibrator =
        NumericalCalibrator::new(array![1.0, 2.0, 3.0, 4.0], options).expect("valid grid");

    // Act
    update_and_project(&mut calibrator, 3.0, array![1.0, 2.0, 2.0]);

    // Assert
    let kernel = calibrator.kernel();
    assert!((kernel.bias - 2.25).abs() < 1e-12);
    for (height, expected) in kernel.heights.iter().zip([0.25, 1.25, 1.25]) {
        assert!((height - expected).abs() < 1e-12);
    }
    let outputs = calibrator.keypoints_outputs();
    assert_eq!(outputs[outputs.len() - 1], 5.0);
    assert_eq!(calibrator.forward(&array![100.0].view())[0], 5.0);
}

#[test]
// Purpose
// -------
// Exercise the learned-keypoints flow end to end: seeding, forward
// consistency, logit updates moving interior breakpoints, and constraint
// projection coexisting with grid learning.
//
// Given
// -----
// - An unevenly spaced 4-keypoint grid on [0, 6] with learned keypoints,
//   `Increasing` direction, bounds [0, 3], equal-slopes initialization.
//
// Expect
// ------
// - The first forward pass matches a fixed-grid calibrator with the same
//   configuration (seeding reproduces the input grid).
// - After a logit update the interior breakpoints move while the endpoints
//   and the span stay fixed, and outputs stay within bounds after an
//   infeasible kernel update plus projection.
fn learned_keypoints_flow_end_to_end() {
    // Arrange
    let seed = array![0.0, 1.0, 2.0, 6.0];
    let options =
        make_options(Some(Monotonicity::Increasing), Some(0.0), Some(3.0), KernelInit::EqualSlopes);
    let mut learned = NumericalCalibrator::with_learned_keypoints(seed.clone(), options.clone())
        .expect("valid learned grid");
    let fixed = NumericalCalibrator::new(seed, options).expect("valid fixed grid");

    let inputs = Array1::linspace(0.0, 6.0, 13);

    // Act / Assert: seeded learned grid evaluates like the fixed grid.
    let learned_outputs = learned.forward(&inputs.view());
    let fixed_outputs = fixed.forward(&inputs.view());
    for (l, f) in learned_outputs.iter().zip(fixed_outputs.iter()) {
        assert!((l - f).abs() < 1e-9);
    }

    // Act: move the interior breakpoints (equal logits => equal segments).
    learned
        .segment_logits_mut()
        .expect("learned grid exposes logits")
        .assign(&array![0.0, 0.0, 0.0]);
    let positions = learned.keypoints_inputs();

    // Assert: endpoints pinned, interior moved, still strictly ascending.
    assert_eq!(positions[0], 0.0);
    assert_eq!(positions[3], 6.0);
    assert!((positions[1] - 2.0).abs() < 1e-9);
    assert!((positions[2] - 4.0).abs() < 1e-9);

    // Act: infeasible update, then projection.
    update_and_project(&mut learned, -2.0, array![5.0, -1.0, 2.0]);

    // Assert: feasible again and bounded on a fresh batch.
    assert!(learned.assert_constraints(DEFAULT_CONSTRAINT_EPS).is_empty());
    for output in learned.forward(&inputs.view()).iter() {
        assert!(*output >= -1e-9 && *output <= 3.0 + 1e-9);
    }
}

#[test]
// Purpose
// -------
// Verify the missing-sentinel path end to end: seeding, routing, training
// updates, and exclusion from constraint projection.
//
// Given
// -----
// - Grid [0, 10], `Increasing` with bounds [0, 1], and
//   `missing_input_value = -1`.
// - A missing-output update to 5.0, far outside the output bounds.
//
// Expect
// ------
// - Sentinel inputs return the learned missing output before and after
//   projection (the missing output is not projected), while regular inputs
//   stay within bounds.
fn missing_sentinel_survives_projection() {
    // Arrange
    let options = CalibratorOptions::new(
        Some(Monotonicity::Increasing),
        Some(0.0),
        Some(1.0),
        Some(-1.0),
        KernelInit::EqualHeights,
        8,
    )
    .expect("valid configuration with missing sentinel");
    let mut calibrator =
        NumericalCalibrator::new(array![0.0, 10.0], options).expect("valid grid");

    // Act
    calibrator.set_missing_output(5.0);
    update_and_project(&mut calibrator, -0.5, array![3.0]);

    // Assert
    let outputs = calibrator.forward(&array![-1.0, 0.0, 5.0, 10.0].view());
    assert_eq!(outputs[0], 5.0);
    for output in outputs.iter().skip(1) {
        assert!(*output >= -1e-9 && *output <= 1.0 + 1e-9);
    }
    assert!(calibrator.assert_constraints(DEFAULT_CONSTRAINT_EPS).is_empty());
}
