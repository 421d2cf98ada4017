//! Errors for piecewise-linear calibrators (keypoint-grid validation and
//! configuration checks).
//!
//! This module defines a single calibrator error type, [`CalibratorError`],
//! used across the Python-facing API and the internal Rust core. It implements
//! `Display`/`Error` and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Keypoints must be **finite and strictly ascending**, with at least two.
//! - Output bounds must be finite, with `output_min <= output_max` when both
//!   are present.
//! - Forward evaluation and constraint projection never produce errors: given
//!   a validly constructed calibrator they are plain arithmetic over
//!   fixed-shape arrays. Shape mismatches introduced by callers are logic
//!   bugs and fail fast via preconditions instead of surfacing here.

#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for calibrator operations that may produce
/// [`CalibratorError`].
pub type CalibratorResult<T> = Result<T, CalibratorError>;

/// Unified error type for calibrator construction.
///
/// Covers keypoint-grid validation and configuration checks performed at
/// construction time. Implements `Display`/`Error` and converts to a Python
/// `ValueError` at PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibratorError {
    // ---- Keypoint-grid validation ----
    /// Fewer than two input keypoints were supplied.
    TooFewKeypoints { count: usize },

    /// A keypoint is NaN/±inf.
    NonFiniteKeypoint { index: usize, value: f64 },

    /// Consecutive keypoints are not strictly ascending.
    NonAscendingKeypoints { index: usize, prev: f64, next: f64 },

    // ---- Configuration validation ----
    /// `output_min` exceeds `output_max`.
    InvalidOutputBounds { min: f64, max: f64 },

    /// A supplied output bound is NaN/±inf.
    NonFiniteOutputBound { value: f64 },

    /// The configured missing-input sentinel is NaN/±inf.
    NonFiniteMissingValue { value: f64 },

    /// `projection_iterations` must be at least 1.
    InvalidProjectionIterations { value: usize },
}

impl std::error::Error for CalibratorError {}

impl std::fmt::Display for CalibratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Keypoint-grid validation ----
            CalibratorError::TooFewKeypoints { count } => {
                write!(f, "At least 2 input keypoints are required; got {count}.")
            }
            CalibratorError::NonFiniteKeypoint { index, value } => {
                write!(f, "Input keypoint at index {index} is non-finite: {value}")
            }
            CalibratorError::NonAscendingKeypoints { index, prev, next } => {
                write!(
                    f,
                    "Input keypoints must be strictly ascending; keypoint at index {} ({next}) \
                     does not exceed its predecessor ({prev}).",
                    index
                )
            }
            // ---- Configuration validation ----
            CalibratorError::InvalidOutputBounds { min, max } => {
                write!(f, "output_min ({min}) must not exceed output_max ({max}).")
            }
            CalibratorError::NonFiniteOutputBound { value } => {
                write!(f, "Output bounds must be finite; got: {value}")
            }
            CalibratorError::NonFiniteMissingValue { value } => {
                write!(f, "missing_input_value must be finite; got: {value}")
            }
            CalibratorError::InvalidProjectionIterations { value } => {
                write!(f, "projection_iterations must be at least 1; got {value}.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CalibratorError> for PyErr {
    fn from(err: CalibratorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
