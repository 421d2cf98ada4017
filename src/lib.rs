//! rust_calibration — piecewise-linear feature calibrators with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the calibration layers to Python via the `_rust_calibration`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and submodules used by the
//! `rust_calibration` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`calibration`) as the public crate
//!   surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_calibration` Python extension.
//! - Create and register the `layers` Python submodule under
//!   `rust_calibration` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants and signatures of their Rust counterparts
//!   (e.g. `NumericalCalibrator`).
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_calibration.<submodule>` and
//!   are typically wrapped by thin pure-Python facades in the top-level
//!   `rust_calibration` package.
//! - Indexing and constraint conventions follow the documentation of the
//!   underlying Rust modules (`calibration::core`, `calibration::models`).
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_rust_calibration` module
//!   defined here and wraps its classes in user-facing Python APIs.
//! - External users are expected to interact with either the safe Rust APIs
//!   or the pure-Python wrappers; the PyO3 plumbing is considered internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the crate's integration tests; Python-side smoke tests verify
//!   that classes can be constructed, called, and round-tripped correctly.

pub mod calibration;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::{
        core::kernel::Kernel,
        models::numerical::{NumericalCalibrator as CoreCalibrator, DEFAULT_CONSTRAINT_EPS},
    },
    utils::{build_calibrator, extract_f64_array},
};

/// NumericalCalibrator — Python-facing wrapper for single-feature
/// piecewise-linear calibrators.
///
/// Purpose
/// -------
/// Expose the calibrator API to Python callers while preserving the core
/// Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build a calibrator from Python-friendly arguments (keypoint array,
///   constraint strings, optional bounds and missing sentinel).
/// - Provide `forward`, `apply_constraints`, and `assert_constraints`
///   methods that convert Python arrays and delegate to the core
///   implementation.
/// - Expose the trainable state (bias, heights, segment logits, missing
///   output) via properties so Python-side training loops can read and write
///   parameters between passes.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `NumericalCalibrator(input_keypoints, missing_input_value=None,
/// output_min=None, output_max=None, monotonicity=None,
/// kernel_init=None, projection_iterations=None,
/// learn_input_keypoints=False)`:
/// - `input_keypoints`: one-dimensional array-like of `f64`; at least two
///   finite, strictly ascending values.
/// - `missing_input_value`: optional finite sentinel routed to a dedicated
///   learned output.
/// - `output_min` / `output_max`: optional finite output bounds with
///   `min <= max`.
/// - `monotonicity`: `'increasing'`, `'decreasing'`, or `'none'`/`None`.
/// - `kernel_init`: `'equal_heights'` (default) or `'equal_slopes'`.
/// - `projection_iterations`: alternating-projection round budget (>= 1).
/// - `learn_input_keypoints`: learn the interior breakpoints when `True`.
///
/// Fields
/// ------
/// - `inner`: [`CoreCalibrator`]
///   Fully configured calibrator owning all trainable state.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed calibrator created through
///   [`build_calibrator`]; grid and kernel sizes are consistent.
///
/// Performance
/// -----------
/// - All numerical work occurs inside `inner`; this wrapper performs only
///   input conversion, dispatch, and error mapping. `forward` allocates one
///   output array per call.
///
/// Notes
/// -----
/// - Native Rust callers should work with the core
///   [`NumericalCalibrator`](crate::calibration::models::NumericalCalibrator)
///   directly; this type exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "NumericalCalibrator", module = "rust_calibration.layers")]
pub struct PyNumericalCalibrator {
    /// Underlying Rust calibrator.
    pub inner: CoreCalibrator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyNumericalCalibrator {
    #[new]
    #[pyo3(
        signature = (
            input_keypoints,
            missing_input_value = None,
            output_min = None,
            output_max = None,
            monotonicity = None,
            kernel_init = None,
            projection_iterations = None,
            learn_input_keypoints = None,
        ),
        text_signature = "(input_keypoints, /, missing_input_value=None, output_min=None, \
                          output_max=None, monotonicity=None, kernel_init=None, \
                          projection_iterations=None, learn_input_keypoints=False)"
    )]
    pub fn new<'py>(
        py: Python<'py>, input_keypoints: &Bound<'py, PyAny>, missing_input_value: Option<f64>,
        output_min: Option<f64>, output_max: Option<f64>, monotonicity: Option<&str>,
        kernel_init: Option<&str>, projection_iterations: Option<usize>,
        learn_input_keypoints: Option<bool>,
    ) -> PyResult<Self> {
        let inner = build_calibrator(
            py,
            input_keypoints,
            missing_input_value,
            output_min,
            output_max,
            monotonicity,
            kernel_init,
            projection_iterations,
            learn_input_keypoints,
        )?;
        Ok(PyNumericalCalibrator { inner })
    }

    /// Evaluate the calibrator on a batch of scalar inputs.
    pub fn forward<'py>(
        &self, py: Python<'py>, inputs: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let arr = extract_f64_array(py, inputs)?;
        let slice = arr.as_slice().map_err(|_| {
            PyValueError::new_err("inputs must be a 1-D contiguous float64 array or sequence")
        })?;
        let batch = Array1::from(slice.to_vec());
        let outputs = self.inner.forward(&batch.view());
        Ok(outputs.into_pyarray(py))
    }

    /// Project the kernel onto the configured feasible set.
    pub fn apply_constraints(&mut self) {
        self.inner.apply_constraints();
    }

    /// Report which configured constraints the kernel currently violates.
    #[pyo3(signature = (eps = None), text_signature = "(self, eps=1e-6)")]
    pub fn assert_constraints(&self, eps: Option<f64>) -> Vec<String> {
        self.inner.assert_constraints(eps.unwrap_or(DEFAULT_CONSTRAINT_EPS))
    }

    /// Current breakpoint positions.
    pub fn keypoints_inputs<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.keypoints_inputs().into_pyarray(py)
    }

    /// Current calibrator outputs at each breakpoint.
    pub fn keypoints_outputs<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.keypoints_outputs().into_pyarray(py)
    }

    /// Replace the kernel wholesale (training-loop write path).
    pub fn set_kernel<'py>(
        &mut self, py: Python<'py>, bias: f64, heights: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let arr = extract_f64_array(py, heights)?;
        let slice = arr.as_slice().map_err(|_| {
            PyValueError::new_err("heights must be a 1-D contiguous float64 array or sequence")
        })?;
        if slice.len() != self.inner.grid.num_segments() {
            return Err(PyValueError::new_err(format!(
                "expected {} heights (one per keypoint interval); got {}",
                self.inner.grid.num_segments(),
                slice.len()
            )));
        }
        self.inner.set_kernel(Kernel::new(bias, Array1::from(slice.to_vec())));
        Ok(())
    }

    #[getter]
    pub fn bias(&self) -> f64 {
        self.inner.kernel().bias
    }

    #[getter]
    pub fn heights(&self) -> Vec<f64> {
        self.inner.kernel().heights.to_vec()
    }

    #[getter]
    pub fn segment_logits(&self) -> Option<Vec<f64>> {
        self.inner.segment_logits().map(|logits| logits.to_vec())
    }

    #[setter]
    pub fn set_segment_logits(&mut self, logits: Vec<f64>) -> PyResult<()> {
        match self.inner.segment_logits_mut() {
            Some(current) => {
                if logits.len() != current.len() {
                    return Err(PyValueError::new_err(format!(
                        "expected {} segment logits; got {}",
                        current.len(),
                        logits.len()
                    )));
                }
                current.assign(&Array1::from(logits));
                Ok(())
            }
            None => Err(PyValueError::new_err(
                "segment logits are only available when learn_input_keypoints=True",
            )),
        }
    }

    #[getter]
    pub fn missing_output(&self) -> Option<f64> {
        self.inner.missing_output()
    }

    #[setter]
    pub fn set_missing_output(&mut self, output: f64) {
        self.inner.set_missing_output(output);
    }
}

/// _rust_calibration — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_calibration` Python module and register its submodules
/// used by the public `rust_calibration` package.
///
/// Key behaviors
/// -------------
/// - Create the `layers` submodule.
/// - Attach it to the parent `_rust_calibration` module.
/// - Register the submodule in `sys.modules` so it is importable via dotted
///   paths from Python.
///
/// Parameters
/// ----------
/// - `_py`: [`Python`]
///   GIL token provided by PyO3 during module initialization.
/// - `m`: `&Bound<PyModule>`
///   Module object representing `_rust_calibration`.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or a Python exception if registration fails.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
///
/// Panics
/// ------
/// - Never panics under normal operation; all failures are mapped into
///   `PyErr`.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_calibration<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let layers_mod = PyModule::new(_py, "layers")?;
    layers(_py, m, &layers_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_calibration.layers", layers_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn layers<'py>(
    _py: Python, rust_calibration: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyNumericalCalibrator>()?;
    rust_calibration.add_submodule(m)?;
    Ok(())
}
