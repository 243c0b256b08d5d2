//! Python bindings for the transform façade

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::complex::PhaseEstimator;
use crate::spectrum::{self, Fft, FftConfig, Registry};

/// Double-precision real FFT exposed to Python
#[pyclass(name = "FFT")]
pub struct PyFft {
    fft: Fft,
}

#[pymethods]
impl PyFft {
    /// Create a transform
    ///
    /// Args:
    ///     size: Transform size (power of 2)
    ///     implementation: Engine name, or None for the current default
    ///     approximate_phase: Use the fast arctangent in forward_polar
    #[new]
    #[pyo3(signature = (size, implementation=None, approximate_phase=false))]
    fn new(size: usize, implementation: Option<String>, approximate_phase: bool) -> PyResult<Self> {
        let config = FftConfig {
            implementation,
            phase: if approximate_phase {
                PhaseEstimator::Approximate
            } else {
                PhaseEstimator::Exact
            },
        };
        let registry = Registry::lock_global()?;
        let fft = Fft::with_config(&registry, size, config)?;
        Ok(Self { fft })
    }

    /// Forward transform
    ///
    /// Returns:
    ///     (re, im) half spectrum, size/2 + 1 bins each
    fn forward<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let mut re = vec![0.0; self.fft.bins()];
        let mut im = vec![0.0; self.fft.bins()];
        self.fft.forward(signal.as_slice()?, &mut re, &mut im)?;
        Ok((PyArray1::from_vec(py, re), PyArray1::from_vec(py, im)))
    }

    /// Forward transform in polar form
    ///
    /// Returns:
    ///     (magnitude, phase) half spectrum
    fn forward_polar<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let mut mag = vec![0.0; self.fft.bins()];
        let mut phase = vec![0.0; self.fft.bins()];
        self.fft.forward_polar(signal.as_slice()?, &mut mag, &mut phase)?;
        Ok((PyArray1::from_vec(py, mag), PyArray1::from_vec(py, phase)))
    }

    /// Magnitude spectrum
    fn forward_magnitude<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut mag = vec![0.0; self.fft.bins()];
        self.fft.forward_magnitude(signal.as_slice()?, &mut mag)?;
        Ok(PyArray1::from_vec(py, mag))
    }

    /// Inverse transform (unscaled)
    fn inverse<'py>(
        &mut self,
        py: Python<'py>,
        re: PyReadonlyArray1<f64>,
        im: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut out = vec![0.0; self.fft.size()];
        self.fft.inverse(re.as_slice()?, im.as_slice()?, &mut out)?;
        Ok(PyArray1::from_vec(py, out))
    }

    /// Inverse transform from magnitude and phase (unscaled)
    fn inverse_polar<'py>(
        &mut self,
        py: Python<'py>,
        mag: PyReadonlyArray1<f64>,
        phase: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut out = vec![0.0; self.fft.size()];
        self.fft.inverse_polar(mag.as_slice()?, phase.as_slice()?, &mut out)?;
        Ok(PyArray1::from_vec(py, out))
    }

    /// Real cepstrum of a magnitude spectrum (unscaled)
    fn inverse_cepstral<'py>(
        &mut self,
        py: Python<'py>,
        mag: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut out = vec![0.0; self.fft.size()];
        self.fft.inverse_cepstral(mag.as_slice()?, &mut out)?;
        Ok(PyArray1::from_vec(py, out))
    }

    #[getter]
    fn size(&self) -> usize {
        self.fft.size()
    }

    #[getter]
    fn implementation(&self) -> String {
        self.fft.implementation().to_string()
    }

    /// Names of the registered engines
    #[staticmethod]
    fn implementations() -> PyResult<Vec<String>> {
        Ok(spectrum::implementations()?)
    }

    /// Engine used by transforms created without an explicit name
    #[staticmethod]
    fn default_implementation() -> PyResult<Option<String>> {
        Ok(spectrum::default_implementation()?)
    }

    #[staticmethod]
    fn set_default_implementation(name: &str) -> PyResult<()> {
        Ok(spectrum::set_default_implementation(name)?)
    }
}
