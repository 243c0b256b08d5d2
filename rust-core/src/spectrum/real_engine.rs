//! Engine backed by realfft, for real-valued signals
//!
//! Native in both precisions.

use num_complex::Complex;
use num_traits::Zero;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::FftNum;
use std::sync::Arc;
use tracing::debug;

use super::engine::{Engine, EngineFactory, Precisions};
use super::FftError;

/// Registered name of [`RealFftFactory`]
pub const REALFFT: &str = "realfft";

/// realfft forward/inverse pair for one size
pub struct RealFftEngine<T: FftNum> {
    /// Transform size (number of samples)
    size: usize,

    r2c: Arc<dyn RealToComplex<T>>,
    c2r: Arc<dyn ComplexToReal<T>>,

    /// Reusable time-domain buffer; realfft overwrites its input
    time: Vec<T>,

    /// Reusable half spectrum
    spectrum: Vec<Complex<T>>,

    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> RealFftEngine<T> {
    /// Plan both directions
    ///
    /// # Arguments
    /// * `size` - Transform size (number of samples)
    pub fn new(size: usize) -> Self {
        let mut planner = RealFftPlanner::<T>::new();
        let r2c = planner.plan_fft_forward(size);
        let c2r = planner.plan_fft_inverse(size);

        let scratch_len = r2c.get_scratch_len().max(c2r.get_scratch_len());

        Self {
            size,
            time: vec![T::zero(); size],
            spectrum: vec![Complex::zero(); size / 2 + 1],
            scratch: vec![Complex::zero(); scratch_len],
            r2c,
            c2r,
        }
    }
}

impl<T: FftNum> Engine<T> for RealFftEngine<T> {
    fn forward(&mut self, input: &[T], re: &mut [T], im: &mut [T]) -> Result<(), FftError> {
        self.time.copy_from_slice(&input[..self.size]);

        self.r2c
            .process_with_scratch(&mut self.time, &mut self.spectrum, &mut self.scratch)
            .map_err(|e| FftError::InternalError(e.to_string()))?;

        for ((r, i), c) in re.iter_mut().zip(im.iter_mut()).zip(&self.spectrum) {
            *r = c.re;
            *i = c.im;
        }
        Ok(())
    }

    fn inverse(&mut self, re: &[T], im: &[T], output: &mut [T]) -> Result<(), FftError> {
        for ((c, &r), &i) in self.spectrum.iter_mut().zip(re).zip(im) {
            *c = Complex::new(r, i);
        }

        // realfft rejects non-zero imaginary parts at DC and Nyquist
        self.spectrum[0].im = T::zero();
        if self.size % 2 == 0 {
            let last = self.spectrum.len() - 1;
            self.spectrum[last].im = T::zero();
        }

        self.c2r
            .process_with_scratch(&mut self.spectrum, &mut self.time, &mut self.scratch)
            .map_err(|e| FftError::InternalError(e.to_string()))?;

        output[..self.size].copy_from_slice(&self.time);
        Ok(())
    }
}

/// Factory for [`RealFftEngine`]
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFftFactory;

impl EngineFactory for RealFftFactory {
    fn name(&self) -> &str {
        REALFFT
    }

    fn supported_precisions(&self) -> Precisions {
        Precisions::BOTH
    }

    fn build_single(&self, size: usize) -> Result<Box<dyn Engine<f32>>, FftError> {
        debug!(size, "planning realfft single-precision engine");
        Ok(Box::new(RealFftEngine::<f32>::new(size)))
    }

    fn build_double(&self, size: usize) -> Result<Box<dyn Engine<f64>>, FftError> {
        debug!(size, "planning realfft double-precision engine");
        Ok(Box::new(RealFftEngine::<f64>::new(size)))
    }
}
