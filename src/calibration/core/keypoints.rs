//! Keypoint grids — fixed and learned input breakpoints for piecewise-linear
//! calibrators.
//!
//! Purpose
//! -------
//! Hold the ascending sequence of input breakpoints over which a calibrator
//! interpolates, in one of two modes: a *fixed* grid stored verbatim at
//! construction, or a *learned* grid where only the first and last breakpoint
//! are fixed and the interior positions are derived on every evaluation from
//! trainable segment logits.
//!
//! Key behaviors
//! -------------
//! - Validate candidate breakpoints at construction (at least two, finite,
//!   strictly ascending) via [`validate_keypoints`], surfacing violations as
//!   typed errors.
//! - In learned mode, reparameterize the interior breakpoints through a
//!   softmax over unconstrained logits: segment lengths are
//!   `softmax(logits) * span`, so ordering and positivity hold by
//!   construction without explicit projection.
//! - Seed the logits so that the initial segment lengths reproduce the
//!   original spacing exactly: `logits_i = ln(length_i / span)`.
//! - Recompute positions from the *current* logits on every
//!   [`KeypointGrid::positions`] call, so a training loop that mutates the
//!   logits sees the updated grid in the next forward pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fixed mode: stored positions are finite and strictly ascending with
//!   `n >= 2`.
//! - Learned mode: `first < last`; the logits array has one entry per
//!   segment (`n - 1`); derived segment lengths are strictly positive and
//!   sum to `last - first` up to floating-point rounding; the final derived
//!   position equals `last` exactly (pinned, not accumulated).
//!
//! Conventions
//! -----------
//! - `n` denotes the number of keypoints; there are `n - 1` segments.
//! - The softmax subtracts the maximum logit before exponentiating, the
//!   usual overflow guard.
//!
//! Downstream usage
//! ----------------
//! - Forward evaluation calls [`KeypointGrid::positions`] at the start of
//!   every pass; projection and validation never touch the grid.
//! - A training loop treats [`KeypointGrid::segment_logits_mut`] as the
//!   persisted trainable state for learned grids.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction rejections, logits seeding against
//!   reference spacings, exact reconstruction of the seeded grid, and the
//!   length-sum conservation invariant.
use crate::calibration::{
    core::validation::validate_keypoints,
    errors::CalibratorResult,
};
use ndarray::Array1;

/// KeypointGrid — ascending input breakpoints, fixed or learned.
///
/// Purpose
/// -------
/// Provide the breakpoint positions consumed by forward evaluation, either
/// stored verbatim (`Fixed`) or derived per call from trainable segment
/// logits (`Learned`).
///
/// Variants
/// --------
/// - `Fixed { positions }`
///   The validated breakpoint array, returned as-is by `positions()`.
/// - `Learned { first, last, segment_logits }`
///   Endpoints plus one unconstrained logit per segment. Interior positions
///   are recomputed from the logits on every `positions()` call.
///
/// Invariants
/// ----------
/// - See module docs; enforced by [`KeypointGrid::fixed`] and
///   [`KeypointGrid::learned`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeypointGrid {
    /// Breakpoints fixed at construction.
    Fixed {
        /// Strictly ascending breakpoint positions, length `n >= 2`.
        positions: Array1<f64>,
    },
    /// Interior breakpoints derived from trainable logits.
    Learned {
        /// First (fixed) breakpoint.
        first: f64,
        /// Last (fixed) breakpoint.
        last: f64,
        /// One unconstrained logit per segment, length `n - 1`.
        segment_logits: Array1<f64>,
    },
}

impl KeypointGrid {
    /// Construct a fixed grid from candidate breakpoints.
    ///
    /// Parameters
    /// ----------
    /// - `positions`: `Array1<f64>`
    ///   Candidate breakpoints. Must contain at least two finite, strictly
    ///   ascending values.
    ///
    /// Returns
    /// -------
    /// `CalibratorResult<KeypointGrid>`
    ///   - `Ok(KeypointGrid::Fixed { .. })` when validation passes.
    ///   - `Err(CalibratorError)` otherwise.
    ///
    /// Errors
    /// ------
    /// - `CalibratorError::TooFewKeypoints`, `NonFiniteKeypoint`, or
    ///   `NonAscendingKeypoints` from [`validate_keypoints`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_calibration::calibration::core::keypoints::KeypointGrid;
    /// let grid = KeypointGrid::fixed(array![0.0, 1.0, 2.5]).unwrap();
    /// assert_eq!(grid.num_keypoints(), 3);
    /// ```
    pub fn fixed(positions: Array1<f64>) -> CalibratorResult<KeypointGrid> {
        validate_keypoints(&positions.view())?;
        Ok(KeypointGrid::Fixed { positions })
    }

    /// Construct a learned grid seeded from candidate breakpoints.
    ///
    /// The endpoints of `positions` become the fixed `first`/`last`; the
    /// initial spacing seeds the segment logits as
    /// `logits_i = ln(length_i / span)`, so the first `positions()` call
    /// reproduces the input grid exactly (up to floating-point rounding).
    ///
    /// Parameters
    /// ----------
    /// - `positions`: `Array1<f64>`
    ///   Candidate breakpoints, validated as in [`KeypointGrid::fixed`].
    ///
    /// Returns
    /// -------
    /// `CalibratorResult<KeypointGrid>`
    ///   - `Ok(KeypointGrid::Learned { .. })` when validation passes.
    ///   - `Err(CalibratorError)` otherwise.
    ///
    /// Errors
    /// ------
    /// - Same as [`KeypointGrid::fixed`].
    pub fn learned(positions: Array1<f64>) -> CalibratorResult<KeypointGrid> {
        validate_keypoints(&positions.view())?;
        let n = positions.len();
        let first = positions[0];
        let last = positions[n - 1];
        let span = last - first;
        let segment_logits = Array1::from_iter(
            positions
                .windows(2)
                .into_iter()
                .map(|pair| ((pair[1] - pair[0]) / span).ln()),
        );
        Ok(KeypointGrid::Learned { first, last, segment_logits })
    }

    /// Number of keypoints `n`.
    pub fn num_keypoints(&self) -> usize {
        match self {
            KeypointGrid::Fixed { positions } => positions.len(),
            KeypointGrid::Learned { segment_logits, .. } => segment_logits.len() + 1,
        }
    }

    /// Number of segments `n - 1`.
    pub fn num_segments(&self) -> usize {
        self.num_keypoints() - 1
    }

    /// Whether interior breakpoints are learned.
    pub fn is_learned(&self) -> bool {
        matches!(self, KeypointGrid::Learned { .. })
    }

    /// Current breakpoint positions, length `n`.
    ///
    /// Fixed mode returns the stored array. Learned mode recomputes the
    /// interior positions from the current logits: segment lengths are
    /// `softmax(logits) * span`, interior positions are their running sums
    /// offset from `first`, and the final position is pinned to `last`
    /// exactly. Callers that mutate the logits between calls observe the
    /// updated grid.
    pub fn positions(&self) -> Array1<f64> {
        match self {
            KeypointGrid::Fixed { positions } => positions.clone(),
            KeypointGrid::Learned { first, last, segment_logits } => {
                let lengths = segment_lengths(segment_logits, last - first);
                let n = lengths.len() + 1;
                let mut positions = Array1::zeros(n);
                positions[0] = *first;
                let mut cursor = *first;
                for (i, length) in lengths.iter().take(n - 2).enumerate() {
                    cursor += length;
                    positions[i + 1] = cursor;
                }
                positions[n - 1] = *last;
                positions
            }
        }
    }

    /// Current segment lengths, length `n - 1`.
    ///
    /// Fixed mode differences the stored positions; learned mode applies the
    /// softmax reparameterization. In both modes the lengths are strictly
    /// positive and sum to `last - first`.
    pub fn segment_lengths(&self) -> Array1<f64> {
        match self {
            KeypointGrid::Fixed { positions } => Array1::from_iter(
                positions.windows(2).into_iter().map(|pair| pair[1] - pair[0]),
            ),
            KeypointGrid::Learned { first, last, segment_logits } => {
                segment_lengths(segment_logits, last - first)
            }
        }
    }

    /// Trainable segment logits, or `None` for a fixed grid.
    pub fn segment_logits(&self) -> Option<&Array1<f64>> {
        match self {
            KeypointGrid::Fixed { .. } => None,
            KeypointGrid::Learned { segment_logits, .. } => Some(segment_logits),
        }
    }

    /// Mutable trainable segment logits, or `None` for a fixed grid.
    pub fn segment_logits_mut(&mut self) -> Option<&mut Array1<f64>> {
        match self {
            KeypointGrid::Fixed { .. } => None,
            KeypointGrid::Learned { segment_logits, .. } => Some(segment_logits),
        }
    }
}

/// Softmax-reparameterized segment lengths: `softmax(logits) * span`.
///
/// Subtracts the maximum logit before exponentiating so extreme logits do
/// not overflow. Every returned length is strictly positive and the lengths
/// sum to `span` up to rounding.
fn segment_lengths(logits: &Array1<f64>, span: f64) -> Array1<f64> {
    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.mapv(|logit| (logit - max_logit).exp());
    let total: f64 = exps.sum();
    exps.mapv(|e| e / total * span)
}
