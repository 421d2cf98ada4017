#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::calibration::{
    core::config::{CalibratorOptions, KernelInit, Monotonicity, DEFAULT_PROJECTION_ITERATIONS},
    models::numerical::NumericalCalibrator,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
pub fn build_calibrator<'py>(
    py: Python<'py>, input_keypoints: &Bound<'py, PyAny>, missing_input_value: Option<f64>,
    output_min: Option<f64>, output_max: Option<f64>, monotonicity: Option<&str>,
    kernel_init: Option<&str>, projection_iterations: Option<usize>,
    learn_input_keypoints: Option<bool>,
) -> PyResult<NumericalCalibrator> {
    let keypoints_arr = extract_f64_array(py, input_keypoints)?;
    let keypoints_slice = keypoints_arr.as_slice().map_err(|_| {
        PyValueError::new_err("input_keypoints must be a 1-D contiguous float64 array or sequence")
    })?;
    let keypoints = Array1::from(keypoints_slice.to_vec());

    let direction = extract_monotonicity(monotonicity)?;
    let init_policy = extract_kernel_init(kernel_init)?;
    let iterations = projection_iterations.unwrap_or(DEFAULT_PROJECTION_ITERATIONS);

    let options = CalibratorOptions::new(
        direction,
        output_min,
        output_max,
        missing_input_value,
        init_policy,
        iterations,
    )?;

    let calibrator = if learn_input_keypoints.unwrap_or(false) {
        NumericalCalibrator::with_learned_keypoints(keypoints, options)?
    } else {
        NumericalCalibrator::new(keypoints, options)?
    };
    Ok(calibrator)
}

#[cfg(feature = "python-bindings")]
fn extract_monotonicity(monotonicity: Option<&str>) -> PyResult<Option<Monotonicity>> {
    let direction = match monotonicity {
        None => None,
        Some(name) => match name.to_lowercase().as_str() {
            "none" => None,
            "increasing" => Some(Monotonicity::Increasing),
            "decreasing" => Some(Monotonicity::Decreasing),
            other => {
                return Err(PyValueError::new_err(format!(
                    "invalid monotonicity {:?} (expected 'increasing', 'decreasing', or 'none')",
                    other
                )));
            }
        },
    };
    Ok(direction)
}

#[cfg(feature = "python-bindings")]
fn extract_kernel_init(kernel_init: Option<&str>) -> PyResult<KernelInit> {
    let init_str = kernel_init.unwrap_or("equal_heights").to_lowercase();
    let policy = match init_str.as_str() {
        "equal_heights" => KernelInit::EqualHeights,
        "equal_slopes" => KernelInit::EqualSlopes,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid kernel_init {:?} (expected 'equal_heights' or 'equal_slopes')",
                other
            )));
        }
    };
    Ok(policy)
}
