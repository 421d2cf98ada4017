//! Calibrator kernel — the trainable bias-plus-heights parameter vector.
//!
//! Purpose
//! -------
//! Own the trainable parameters of a piecewise-linear calibrator: one bias
//! value plus one signed "height" per interval between consecutive
//! breakpoints. Cumulative sums of the kernel give the calibrator's output
//! at each breakpoint, so the kernel fully determines the function's shape
//! once a keypoint grid is fixed.
//!
//! Key behaviors
//! -------------
//! - Materialize the derived breakpoint outputs via
//!   [`Kernel::keypoint_outputs`] (`outputs[i] = bias + Σ heights[0..i]`).
//! - Implement the two initialization policies selected through
//!   [`KernelInit`]: equal heights (each interval receives an equal share of
//!   the effective output span) and equal slopes (heights proportional to
//!   interval widths, so the initial function is exactly linear).
//! - Under a `Decreasing` direction, start at the upper effective bound and
//!   descend; otherwise start at the lower bound and ascend.
//!
//! Invariants & assumptions
//! ------------------------
//! - `heights.len() == n - 1` for a grid of `n` keypoints. The pairing of a
//!   kernel with a grid of matching size is enforced by the model layer;
//!   free functions here assert the lengths they are handed.
//! - The kernel itself imposes no monotonicity or bound constraints; those
//!   are the projection subsystem's responsibility and hold only right after
//!   `apply_constraints`.
//!
//! Lifecycle
//! ---------
//! Created once at model construction, mutated in place by the external
//! training loop (gradient updates) and by constraint projection, and
//! dropped with the owning calibrator.
use crate::calibration::core::config::{CalibratorOptions, KernelInit, Monotonicity};
use ndarray::{Array1, ArrayView1};

/// Kernel — bias plus per-interval heights of a piecewise-linear calibrator.
///
/// Fields are public: the external training loop updates them in place
/// between forward passes, and constraint projection rewrites them after
/// each update. Both mutations preserve `heights.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Calibrator output at the first breakpoint.
    pub bias: f64,
    /// Signed output delta across each interval, length `n - 1`.
    pub heights: Array1<f64>,
}

impl Kernel {
    /// Construct a kernel from raw parameters.
    ///
    /// No numeric validation is performed: any finite or non-finite values a
    /// training loop produces are representable, and feasibility is restored
    /// separately by projection.
    pub fn new(bias: f64, heights: Array1<f64>) -> Kernel {
        Kernel { bias, heights }
    }

    /// Initialize a kernel for the given grid positions per the configured
    /// policy.
    ///
    /// Dispatches on `options.kernel_init`:
    /// - [`KernelInit::EqualHeights`] → [`Kernel::equal_heights`].
    /// - [`KernelInit::EqualSlopes`] → [`Kernel::equal_slopes`].
    ///
    /// # Panics
    /// - If `positions` has fewer than two entries (grid validation happens
    ///   upstream; a shorter array here is a logic bug).
    pub fn init(positions: &ArrayView1<f64>, options: &CalibratorOptions) -> Kernel {
        match options.kernel_init {
            KernelInit::EqualHeights => Kernel::equal_heights(positions.len(), options),
            KernelInit::EqualSlopes => Kernel::equal_slopes(positions, options),
        }
    }

    /// Equal-heights initialization.
    ///
    /// Let `(lo, hi)` be the effective output range (see
    /// [`CalibratorOptions::effective_output_range`]). For a `Decreasing`
    /// direction the kernel starts at `hi` with each height
    /// `-(hi - lo) / (n - 1)`; otherwise it starts at `lo` with each height
    /// `(hi - lo) / (n - 1)`.
    ///
    /// # Panics
    /// - If `num_keypoints < 2`.
    pub fn equal_heights(num_keypoints: usize, options: &CalibratorOptions) -> Kernel {
        assert!(num_keypoints >= 2, "kernel requires at least 2 keypoints");
        let (lo, hi) = options.effective_output_range();
        let (bias, total_rise) = directed_endpoints(lo, hi, options.monotonicity);
        let height = total_rise / (num_keypoints - 1) as f64;
        Kernel { bias, heights: Array1::from_elem(num_keypoints - 1, height) }
    }

    /// Equal-slopes initialization.
    ///
    /// Same endpoint selection as [`Kernel::equal_heights`], but each height
    /// is `slope * (positions[k+1] - positions[k])` with
    /// `slope = total_rise / (positions[n-1] - positions[0])`, so the
    /// initial function is exactly linear across the full input range.
    ///
    /// # Panics
    /// - If `positions` has fewer than two entries.
    pub fn equal_slopes(positions: &ArrayView1<f64>, options: &CalibratorOptions) -> Kernel {
        assert!(positions.len() >= 2, "kernel requires at least 2 keypoints");
        let (lo, hi) = options.effective_output_range();
        let (bias, total_rise) = directed_endpoints(lo, hi, options.monotonicity);
        let slope = total_rise / (positions[positions.len() - 1] - positions[0]);
        let heights = Array1::from_iter(
            positions.windows(2).into_iter().map(|pair| slope * (pair[1] - pair[0])),
        );
        Kernel { bias, heights }
    }

    /// Number of interval heights (`n - 1`).
    pub fn num_heights(&self) -> usize {
        self.heights.len()
    }

    /// Derived calibrator outputs at each breakpoint, length `n`.
    ///
    /// `outputs[0] = bias`, `outputs[i] = bias + Σ heights[0..i]`.
    pub fn keypoint_outputs(&self) -> Array1<f64> {
        let mut outputs = Array1::zeros(self.heights.len() + 1);
        let mut running = self.bias;
        outputs[0] = running;
        for (i, height) in self.heights.iter().enumerate() {
            running += height;
            outputs[i + 1] = running;
        }
        outputs
    }
}

/// Starting output and signed total rise for the configured direction.
///
/// `Decreasing` descends from `hi` by `lo - hi`; everything else ascends
/// from `lo` by `hi - lo`.
fn directed_endpoints(lo: f64, hi: f64, monotonicity: Option<Monotonicity>) -> (f64, f64) {
    match monotonicity {
        Some(Monotonicity::Decreasing) => (hi, lo - hi),
        _ => (lo, hi - lo),
    }
}
