//! Engine backed by a full-length rustfft complex plan
//!
//! The real input is lifted to complex samples and transformed at full
//! length. On the inverse path the upper half of the spectrum is rebuilt
//! from the caller's half by conjugate symmetry before the transform runs.
//! Registered for double precision only.

use num_complex::Complex;
use num_traits::Zero;
use rustfft::{Fft, FftNum, FftPlanner};
use std::sync::Arc;
use tracing::debug;

use super::engine::{Engine, EngineFactory, Precisions};
use super::FftError;

/// Registered name of [`RustFftFactory`]
pub const RUSTFFT: &str = "rustfft";

/// rustfft forward/inverse pair for one size
pub struct ComplexFftEngine<T: FftNum> {
    size: usize,

    fft: Arc<dyn Fft<T>>,
    ifft: Arc<dyn Fft<T>>,

    /// Full-length working spectrum
    buffer: Vec<Complex<T>>,

    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> ComplexFftEngine<T> {
    /// Plan both directions
    ///
    /// # Arguments
    /// * `size` - Transform size (number of samples)
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<T>::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());

        Self {
            size,
            buffer: vec![Complex::zero(); size],
            scratch: vec![Complex::zero(); scratch_len],
            fft,
            ifft,
        }
    }
}

impl<T: FftNum> Engine<T> for ComplexFftEngine<T> {
    fn forward(&mut self, input: &[T], re: &mut [T], im: &mut [T]) -> Result<(), FftError> {
        for (c, &x) in self.buffer.iter_mut().zip(&input[..self.size]) {
            *c = Complex::new(x, T::zero());
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let bins = self.size / 2 + 1;
        for ((r, i), c) in re.iter_mut().zip(im.iter_mut()).zip(&self.buffer[..bins]) {
            *r = c.re;
            *i = c.im;
        }
        Ok(())
    }

    fn inverse(&mut self, re: &[T], im: &[T], output: &mut [T]) -> Result<(), FftError> {
        let n = self.size;
        let bins = n / 2 + 1;

        for ((c, &r), &i) in self.buffer[..bins].iter_mut().zip(re).zip(im) {
            *c = Complex::new(r, i);
        }
        self.buffer[0].im = T::zero();
        if n % 2 == 0 {
            self.buffer[n / 2].im = T::zero();
        }

        // X[n - k] = conj(X[k])
        for k in 1..(n + 1) / 2 {
            self.buffer[n - k] = self.buffer[k].conj();
        }

        self.ifft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (x, c) in output[..n].iter_mut().zip(&self.buffer) {
            *x = c.re;
        }
        Ok(())
    }
}

/// Factory for [`ComplexFftEngine`]; double precision only
#[derive(Debug, Default, Clone, Copy)]
pub struct RustFftFactory;

impl EngineFactory for RustFftFactory {
    fn name(&self) -> &str {
        RUSTFFT
    }

    fn supported_precisions(&self) -> Precisions {
        Precisions::DOUBLE
    }

    fn build_double(&self, size: usize) -> Result<Box<dyn Engine<f64>>, FftError> {
        debug!(size, "planning rustfft double-precision engine");
        Ok(Box::new(ComplexFftEngine::<f64>::new(size)))
    }
}
