//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::spectrum::FftError;

mod fft_bindings;

impl From<FftError> for PyErr {
    fn from(err: FftError) -> PyErr {
        match err {
            FftError::InternalError(_) => PyErr::new::<PyRuntimeError, _>(err.to_string()),
            _ => PyErr::new::<PyValueError, _>(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn spectral_transform(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<fft_bindings::PyFft>()?;
    Ok(())
}
