//! Real-signal transform façade
//!
//! One [`Fft`] is bound to a power-of-two size and one engine factory. It
//! brings up at most one engine per precision, lazily on first use or
//! through [`Fft::init_single`] / [`Fft::init_double`].
//!
//! Transforms are unscaled in both directions: `inverse(forward(x))`
//! yields `size * x`. Spectra are half spectra of `size / 2 + 1` bins;
//! the imaginary parts of DC and Nyquist are always written (as zero) by
//! the forward transforms and ignored by the inverse ones.
//!
//! Every call takes `f32` or `f64` buffers. When the engine does not
//! compute the requested precision natively the data is promoted or
//! demoted, never rejected.

use num_traits::{AsPrimitive, Float};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::engine::{Engine, EngineFactory, Precision, Precisions};
use super::error::require;
use super::registry::Registry;
use super::FftError;
use crate::alloc::AlignedBuffer;
use crate::complex::{self, PhaseEstimator};
use crate::vector::{self, Sample};

/// Offset added to magnitudes before the log in [`Fft::inverse_cepstral`]
pub const CEPSTRAL_FLOOR: f64 = 1e-6;

/// Façade configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FftConfig {
    /// Engine name; `None` takes the registry default at construction
    pub implementation: Option<String>,

    /// Phase computation for the polar forward transform
    pub phase: PhaseEstimator,
}

impl FftConfig {
    pub fn with_implementation(name: impl Into<String>) -> Self {
        Self {
            implementation: Some(name.into()),
            ..Self::default()
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Sample types the façade accepts: `f32` and `f64`
pub trait FftSample:
    Sample + Float + AsPrimitive<f32> + AsPrimitive<f64> + sealed::Sealed
{
    const PRECISION: Precision;

    #[doc(hidden)]
    fn cast_from<S: FftSample>(x: S) -> Self;
}

impl FftSample for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn cast_from<S: FftSample>(x: S) -> f32 {
        <S as AsPrimitive<f32>>::as_(x)
    }
}

impl FftSample for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn cast_from<S: FftSample>(x: S) -> f64 {
        <S as AsPrimitive<f64>>::as_(x)
    }
}

fn cast_slice<S: FftSample, D: FftSample>(dst: &mut [D], src: &[S]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = D::cast_from(s);
    }
}

/// Engine plus staging buffers for one compute precision
struct Workspace<C: FftSample> {
    engine: Box<dyn Engine<C>>,

    /// Time domain, `size`
    time: AlignedBuffer<C>,

    /// Half spectrum, `size / 2 + 1` each
    re: AlignedBuffer<C>,
    im: AlignedBuffer<C>,

    /// Packed or polar staging, `2 * (size / 2 + 1)`
    aux: AlignedBuffer<C>,
}

impl<C: FftSample> Workspace<C> {
    fn new(engine: Box<dyn Engine<C>>, size: usize) -> Result<Self, FftError> {
        let bins = size / 2 + 1;
        Ok(Self {
            engine,
            time: AlignedBuffer::allocate_and_zero(size)?,
            re: AlignedBuffer::allocate_and_zero(bins)?,
            im: AlignedBuffer::allocate_and_zero(bins)?,
            aux: AlignedBuffer::allocate_and_zero(2 * bins)?,
        })
    }

    fn forward(&mut self) -> Result<(), FftError> {
        self.engine.forward(&self.time, &mut self.re, &mut self.im)
    }

    fn inverse(&mut self) -> Result<(), FftError> {
        self.engine.inverse(&self.re, &self.im, &mut self.time)
    }
}

/// Maps a compute precision to its workspace slot
trait Slot: FftSample {
    fn slot(fft: &mut Fft) -> &mut Option<Workspace<Self>>;

    fn build(factory: &dyn EngineFactory, size: usize) -> Result<Box<dyn Engine<Self>>, FftError>;
}

impl Slot for f32 {
    fn slot(fft: &mut Fft) -> &mut Option<Workspace<f32>> {
        &mut fft.single
    }

    fn build(factory: &dyn EngineFactory, size: usize) -> Result<Box<dyn Engine<f32>>, FftError> {
        factory.build_single(size)
    }
}

impl Slot for f64 {
    fn slot(fft: &mut Fft) -> &mut Option<Workspace<f64>> {
        &mut fft.double
    }

    fn build(factory: &dyn EngineFactory, size: usize) -> Result<Box<dyn Engine<f64>>, FftError> {
        factory.build_double(size)
    }
}

/// Run `$body` with `$c` bound to the compute type for caller type `$t`
macro_rules! with_compute_type {
    ($fft:expr, $t:ty, |$c:ident| $body:expr) => {
        match $fft.compute_precision(<$t as FftSample>::PRECISION) {
            Precision::Single => {
                type $c = f32;
                $body
            }
            Precision::Double => {
                type $c = f64;
                $body
            }
        }
    };
}

/// Real-signal transform of one fixed size
pub struct Fft {
    size: usize,
    implementation: String,
    factory: Arc<dyn EngineFactory>,
    config: FftConfig,
    single: Option<Workspace<f32>>,
    double: Option<Workspace<f64>>,
}

impl Fft {
    /// Transform of `size` samples using the default engine of
    /// [`Registry::global`]
    pub fn new(size: usize) -> Result<Self, FftError> {
        let registry = Registry::lock_global()?;
        Self::with_config(&registry, size, FftConfig::default())
    }

    /// Transform of `size` samples using the named engine of
    /// [`Registry::global`]
    pub fn with_implementation(size: usize, implementation: &str) -> Result<Self, FftError> {
        let registry = Registry::lock_global()?;
        Self::with_config(&registry, size, FftConfig::with_implementation(implementation))
    }

    /// Transform of `size` samples using the default engine of `registry`
    pub fn with_registry(registry: &Registry, size: usize) -> Result<Self, FftError> {
        Self::with_config(registry, size, FftConfig::default())
    }

    /// Create a transform
    ///
    /// # Arguments
    /// * `registry` - Source of the engine factory; only read here
    /// * `size` - Transform size, a positive power of two
    /// * `config` - Engine name and phase estimator
    pub fn with_config(registry: &Registry, size: usize, config: FftConfig) -> Result<Self, FftError> {
        if size == 0 || !size.is_power_of_two() {
            return Err(FftError::InvalidSize(size));
        }

        let factory = registry.resolve(config.implementation.as_deref())?;
        let implementation = factory.name().to_string();
        if factory.supported_precisions().is_empty() {
            return Err(FftError::InternalError(format!(
                "{} supports no precision",
                implementation
            )));
        }

        debug!(
            implementation = %implementation,
            size,
            phase = ?config.phase,
            "created transform"
        );

        Ok(Self {
            size,
            implementation,
            factory,
            config,
            single: None,
            double: None,
        })
    }

    /// Transform size in samples
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of half-spectrum bins, `size / 2 + 1`
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Name of the bound engine
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    /// Precisions the bound engine computes natively
    pub fn supported_precisions(&self) -> Precisions {
        self.factory.supported_precisions()
    }

    /// Bring up the engine used for `f32` calls
    pub fn init_single(&mut self) -> Result<(), FftError> {
        with_compute_type!(self, f32, |C| self.workspace::<C>(Precision::Single).map(|_| ()))
    }

    /// Bring up the engine used for `f64` calls
    pub fn init_double(&mut self) -> Result<(), FftError> {
        with_compute_type!(self, f64, |C| self.workspace::<C>(Precision::Double).map(|_| ()))
    }

    /// Forward transform into split half spectrum
    ///
    /// # Arguments
    /// * `input` - `size` samples
    /// * `re`, `im` - `size / 2 + 1` bins each
    pub fn forward<T: FftSample>(&mut self, input: &[T], re: &mut [T], im: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("input", input, self.size)?;
        require("re", re, bins)?;
        require("im", im, bins)?;

        with_compute_type!(self, T, |C| {
            let ws = self.forward_staged::<T, C>(input)?;
            cast_slice(&mut re[..bins], &ws.re);
            cast_slice(&mut im[..bins], &ws.im);
            Ok(())
        })
    }

    /// Forward transform into `(re, im)` pairs, `size + 2` values
    pub fn forward_interleaved<T: FftSample>(&mut self, input: &[T], packed: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("input", input, self.size)?;
        require("packed", packed, 2 * bins)?;

        with_compute_type!(self, T, |C| {
            let ws = self.forward_staged::<T, C>(input)?;
            complex::v_split_to_interleaved::<C, C>(&mut ws.aux, &ws.re, &ws.im);
            cast_slice(&mut packed[..2 * bins], &ws.aux);
            Ok(())
        })
    }

    /// Forward transform into magnitude and phase, `size / 2 + 1` each
    pub fn forward_polar<T: FftSample>(&mut self, input: &[T], mag: &mut [T], phase: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("input", input, self.size)?;
        require("mag", mag, bins)?;
        require("phase", phase, bins)?;

        let estimator = self.config.phase;
        with_compute_type!(self, T, |C| {
            let ws = self.forward_staged::<T, C>(input)?;
            let (m, p) = ws.aux.split_at_mut(bins);
            complex::v_cartesian_to_polar_with::<C, C>(estimator, m, p, &ws.re, &ws.im);
            cast_slice(&mut mag[..bins], m);
            cast_slice(&mut phase[..bins], &p[..bins]);
            Ok(())
        })
    }

    /// Forward transform into magnitudes only, `size / 2 + 1`
    pub fn forward_magnitude<T: FftSample>(&mut self, input: &[T], mag: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("input", input, self.size)?;
        require("mag", mag, bins)?;

        with_compute_type!(self, T, |C| {
            let ws = self.forward_staged::<T, C>(input)?;
            complex::v_cartesian_to_magnitudes::<C, C>(&mut ws.aux[..bins], &ws.re, &ws.im);
            cast_slice(&mut mag[..bins], &ws.aux[..bins]);
            Ok(())
        })
    }

    /// Inverse transform from split half spectrum into `size` samples
    pub fn inverse<T: FftSample>(&mut self, re: &[T], im: &[T], output: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("re", re, bins)?;
        require("im", im, bins)?;
        require("output", output, self.size)?;

        with_compute_type!(self, T, |C| {
            let ws = self.workspace::<C>(T::PRECISION)?;
            cast_slice(&mut ws.re, &re[..bins]);
            cast_slice(&mut ws.im, &im[..bins]);
            self.inverse_staged::<T, C>(output)
        })
    }

    /// Inverse transform from `(re, im)` pairs, `size + 2` values
    pub fn inverse_interleaved<T: FftSample>(&mut self, packed: &[T], output: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("packed", packed, 2 * bins)?;
        require("output", output, self.size)?;

        with_compute_type!(self, T, |C| {
            let ws = self.workspace::<C>(T::PRECISION)?;
            cast_slice(&mut ws.aux, &packed[..2 * bins]);
            complex::v_interleaved_to_split::<C, C>(&mut ws.re, &mut ws.im, &ws.aux);
            self.inverse_staged::<T, C>(output)
        })
    }

    /// Inverse transform from magnitude and phase
    pub fn inverse_polar<T: FftSample>(&mut self, mag: &[T], phase: &[T], output: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("mag", mag, bins)?;
        require("phase", phase, bins)?;
        require("output", output, self.size)?;

        with_compute_type!(self, T, |C| {
            let ws = self.workspace::<C>(T::PRECISION)?;
            let (m, p) = ws.aux.split_at_mut(bins);
            cast_slice(m, &mag[..bins]);
            cast_slice(p, &phase[..bins]);
            complex::v_polar_to_cartesian::<C, C>(&mut ws.re, &mut ws.im, m, p);
            self.inverse_staged::<T, C>(output)
        })
    }

    /// Real cepstrum: inverse transform of `ln(mag + 1e-6)` with zero phase
    pub fn inverse_cepstral<T: FftSample>(&mut self, mag: &[T], cepstrum: &mut [T]) -> Result<(), FftError> {
        let bins = self.bins();
        require("mag", mag, bins)?;
        require("cepstrum", cepstrum, self.size)?;

        with_compute_type!(self, T, |C| {
            let ws = self.workspace::<C>(T::PRECISION)?;
            cast_slice(&mut ws.re, &mag[..bins]);
            vector::v_add_scalar(&mut ws.re, C::cast_from(CEPSTRAL_FLOOR));
            vector::v_log(&mut ws.re);
            vector::v_zero(&mut ws.im);
            self.inverse_staged::<T, C>(cepstrum)
        })
    }

    /// Precision to compute a `requested` call in
    fn compute_precision(&self, requested: Precision) -> Precision {
        let native = self.factory.supported_precisions();
        match requested {
            _ if native.contains(requested) => requested,
            Precision::Single => Precision::Double,
            Precision::Double => Precision::Single,
        }
    }

    fn workspace<C: Slot>(&mut self, requested: Precision) -> Result<&mut Workspace<C>, FftError> {
        let ws = match C::slot(self).take() {
            Some(ws) => ws,
            None => {
                if requested != C::PRECISION {
                    warn!(
                        implementation = %self.implementation,
                        requested = %requested,
                        computed = %C::PRECISION,
                        "precision not native to engine, converting"
                    );
                }
                debug!(
                    implementation = %self.implementation,
                    size = self.size,
                    precision = %C::PRECISION,
                    "initializing transform engine"
                );
                let engine = C::build(self.factory.as_ref(), self.size)?;
                Workspace::new(engine, self.size)?
            }
        };
        Ok(C::slot(self).insert(ws))
    }

    fn forward_staged<T: FftSample, C: Slot>(&mut self, input: &[T]) -> Result<&mut Workspace<C>, FftError> {
        let size = self.size;
        let ws = self.workspace::<C>(T::PRECISION)?;
        cast_slice(&mut ws.time, &input[..size]);
        ws.forward()?;
        Ok(ws)
    }

    /// Run the inverse on the staged half spectrum and copy out
    fn inverse_staged<T: FftSample, C: Slot>(&mut self, output: &mut [T]) -> Result<(), FftError> {
        let size = self.size;
        let ws = self.workspace::<C>(T::PRECISION)?;
        ws.inverse()?;
        cast_slice(&mut output[..size], &ws.time);
        Ok(())
    }
}

impl fmt::Debug for Fft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft")
            .field("size", &self.size)
            .field("implementation", &self.implementation)
            .field("config", &self.config)
            .field("single", &self.single.is_some())
            .field("double", &self.double.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::complex_engine::RUSTFFT;
    use crate::spectrum::real_engine::{RealFftEngine, REALFFT};
    use std::f64::consts::{FRAC_PI_2, PI};

    const ENGINES: [&str; 2] = [REALFFT, RUSTFFT];

    fn make(name: &str, size: usize) -> Fft {
        let registry = Registry::default();
        Fft::with_config(&registry, size, FftConfig::with_implementation(name)).unwrap()
    }

    fn assert_close(got: &[f64], want: &[f64], tol: f64) {
        assert_eq!(got.len(), want.len());
        for (k, (g, w)) in got.iter().zip(want).enumerate() {
            assert!((g - w).abs() < tol, "index {}: got {}, want {}", k, g, w);
        }
    }

    fn forward_f64(fft: &mut Fft, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut re = vec![0.0; fft.bins()];
        let mut im = vec![0.0; fft.bins()];
        fft.forward(input, &mut re, &mut im).unwrap();
        (re, im)
    }

    #[test]
    fn test_forward_reference_signals() {
        for name in ENGINES {
            let mut fft = make(name, 4);

            let (re, im) = forward_f64(&mut fft, &[1.0, 1.0, 1.0, 1.0]);
            assert_close(&re, &[4.0, 0.0, 0.0], 1e-12);
            assert_close(&im, &[0.0, 0.0, 0.0], 1e-12);

            let (re, im) = forward_f64(&mut fft, &[0.0, 1.0, 0.0, -1.0]);
            assert_close(&re, &[0.0, 0.0, 0.0], 1e-12);
            assert_close(&im, &[0.0, -2.0, 0.0], 1e-12);

            let (re, im) = forward_f64(&mut fft, &[1.0, 0.0, -1.0, 0.0]);
            assert_close(&re, &[0.0, 2.0, 0.0], 1e-12);
            assert_close(&im, &[0.0, 0.0, 0.0], 1e-12);

            let (re, im) = forward_f64(&mut fft, &[0.5, 1.0, -0.5, -1.0]);
            assert_close(&re, &[0.0, 1.0, 0.0], 1e-12);
            assert_close(&im, &[0.0, -2.0, 0.0], 1e-12);

            let (re, im) = forward_f64(&mut fft, &[1.0, -1.0, 1.0, -1.0]);
            assert_close(&re, &[0.0, 0.0, 4.0], 1e-12);
            assert_close(&im, &[0.0, 0.0, 0.0], 1e-12);

            let (re, im) = forward_f64(&mut fft, &[1.0, 0.0, 0.0, 0.0]);
            assert_close(&re, &[1.0, 1.0, 1.0], 1e-12);
            assert_close(&im, &[0.0, 0.0, 0.0], 1e-12);
        }
    }

    #[test]
    fn test_forward_single_precision() {
        for name in ENGINES {
            let mut fft = make(name, 4);
            let mut re = [0.0f32; 3];
            let mut im = [0.0f32; 3];
            fft.forward(&[0.5f32, 1.0, -0.5, -1.0], &mut re, &mut im).unwrap();
            assert!((re[1] - 1.0).abs() < 1e-6);
            assert!((im[1] + 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_forward_interleaved() {
        for name in ENGINES {
            let mut fft = make(name, 4);
            let mut packed = [9.0f64; 6];
            fft.forward_interleaved(&[0.5, 1.0, -0.5, -1.0], &mut packed).unwrap();
            assert_close(&packed, &[0.0, 0.0, 1.0, -2.0, 0.0, 0.0], 1e-12);
        }
    }

    #[test]
    fn test_forward_polar() {
        for name in ENGINES {
            let mut fft = make(name, 4);
            let mut mag = [0.0f64; 3];
            let mut phase = [0.0f64; 3];

            fft.forward_polar(&[0.0, 1.0, 0.0, -1.0], &mut mag, &mut phase).unwrap();
            assert_close(&mag, &[0.0, 2.0, 0.0], 1e-12);
            assert!((phase[1] + FRAC_PI_2).abs() < 1e-12);

            fft.forward_polar(&[1.0, 0.0, -1.0, 0.0], &mut mag, &mut phase).unwrap();
            assert_close(&mag, &[0.0, 2.0, 0.0], 1e-12);
            assert!(phase[1].abs() < 1e-12);
        }
    }

    #[test]
    fn test_forward_polar_approximate_phase() {
        let registry = Registry::default();
        let config = FftConfig {
            phase: PhaseEstimator::Approximate,
            ..FftConfig::default()
        };
        let mut fft = Fft::with_config(&registry, 8, config).unwrap();

        let input: Vec<f64> = (0..8).map(|i| (i as f64 * 0.9).cos() + 0.3).collect();
        let mut mag = [0.0f64; 5];
        let mut phase = [0.0f64; 5];
        fft.forward_polar(&input, &mut mag, &mut phase).unwrap();

        let (re, im) = forward_f64(&mut fft, &input);
        for k in 0..5 {
            if mag[k] > 1e-9 {
                let exact = im[k].atan2(re[k]);
                let diff = (phase[k] - exact).abs();
                assert!(diff < 0.005 || (2.0 * PI - diff) < 0.005, "bin {}", k);
            }
        }
    }

    #[test]
    fn test_forward_magnitude() {
        for name in ENGINES {
            let mut fft = make(name, 4);
            let mut mag = [0.0f64; 3];
            fft.forward_magnitude(&[0.5, 1.0, -0.5, -1.0], &mut mag).unwrap();
            assert_close(&mag, &[0.0, 5.0f64.sqrt(), 0.0], 1e-12);
        }
    }

    #[test]
    fn test_inverse_forms() {
        for name in ENGINES {
            let mut fft = make(name, 4);
            let mut out = [0.0f64; 4];

            fft.inverse(&[0.0, 1.0, 0.0], &[0.0, -2.0, 0.0], &mut out).unwrap();
            assert_close(&out, &[2.0, 4.0, -2.0, -4.0], 1e-12);

            fft.inverse_interleaved(&[0.0, 0.0, 1.0, -2.0, 0.0, 0.0], &mut out).unwrap();
            assert_close(&out, &[2.0, 4.0, -2.0, -4.0], 1e-12);

            fft.inverse_polar(&[0.0, 2.0, 0.0], &[0.0, 0.0, 0.0], &mut out).unwrap();
            assert_close(&out, &[4.0, 0.0, -4.0, 0.0], 1e-12);

            // Dirac
            fft.inverse(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0], &mut out).unwrap();
            assert_close(&out, &[4.0, 0.0, 0.0, 0.0], 1e-12);
        }
    }

    #[test]
    fn test_inverse_cepstral() {
        for name in ENGINES {
            let mut fft = make(name, 8);
            let input = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

            let mut mag = [0.0f64; 5];
            fft.forward_magnitude(&input, &mut mag).unwrap();

            let mut cep = [0.0f64; 8];
            fft.inverse_cepstral(&mag, &mut cep).unwrap();
            let scaled: Vec<f64> = cep.iter().map(|x| x / 8.0).collect();

            for k in [1, 2, 3, 5, 6, 7] {
                assert!(scaled[k].abs() < 1e-6, "{}: bin {} = {}", name, k, scaled[k]);
            }
            assert!((scaled[0] + 6.561181).abs() < 1e-5);
            assert!((scaled[4] - 7.254329).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bounds_untouched() {
        for name in ENGINES {
            let mut fft = make(name, 4);

            let mut input = [999.0f64; 8];
            input[2..6].copy_from_slice(&[1.0, 0.0, 0.0, 0.0]);
            let mut re = [999.0f64; 7];
            let mut im = [999.0f64; 7];
            fft.forward(&input[2..6], &mut re[2..], &mut im[2..]).unwrap();
            assert_eq!(&re[..2], &[999.0, 999.0]);
            assert_eq!(&re[5..], &[999.0, 999.0]);
            assert_eq!(&im[5..], &[999.0, 999.0]);
            assert_close(&re[2..5], &[1.0, 1.0, 1.0], 1e-12);

            let mut out = [999.0f64; 8];
            fft.inverse(&re[2..5], &im[2..5], &mut out[2..]).unwrap();
            assert_eq!(&out[..2], &[999.0, 999.0]);
            assert_eq!(&out[6..], &[999.0, 999.0]);
            assert_close(&out[2..6], &[4.0, 0.0, 0.0, 0.0], 1e-12);
        }
    }

    #[test]
    fn test_forward_then_inverse_scales_by_size() {
        for name in ENGINES {
            let size = 32;
            let mut fft = make(name, size);
            let input: Vec<f64> = (0..size).map(|i| ((i * 5) % 11) as f64 - 5.0).collect();
            let (re, im) = forward_f64(&mut fft, &input);

            let mut out = vec![0.0; size];
            fft.inverse(&re, &im, &mut out).unwrap();
            let want: Vec<f64> = input.iter().map(|x| x * size as f64).collect();
            assert_close(&out, &want, 1e-9);
        }
    }

    #[test]
    fn test_invalid_sizes() {
        let registry = Registry::default();
        for size in [0, 3, 6, 1000] {
            assert_eq!(
                Fft::with_registry(&registry, size).unwrap_err(),
                FftError::InvalidSize(size)
            );
        }
        let fft = Fft::with_registry(&registry, 1).unwrap();
        assert_eq!(fft.bins(), 1);
    }

    #[test]
    fn test_size_one() {
        let mut fft = make(REALFFT, 1);
        let (re, im) = forward_f64(&mut fft, &[3.0]);
        assert_close(&re, &[3.0], 1e-12);
        assert_close(&im, &[0.0], 1e-12);
    }

    #[test]
    fn test_null_arguments() {
        let mut fft = make(REALFFT, 8);
        let mut re = [0.0f64; 5];
        let mut im = [0.0f64; 5];

        let err = fft.forward(&[], &mut re, &mut im).unwrap_err();
        assert!(matches!(err, FftError::NullArgument { argument: "input", .. }));

        let err = fft.forward(&[0.0; 8], &mut re[..4], &mut im).unwrap_err();
        assert_eq!(
            err,
            FftError::NullArgument {
                argument: "re",
                required: 5,
                actual: 4
            }
        );

        let mut out = [7.0f64; 8];
        let err = fft.inverse(&re, &im[..0], &mut out).unwrap_err();
        assert!(matches!(err, FftError::NullArgument { argument: "im", .. }));
        assert_eq!(out, [7.0; 8]);

        let err = fft.inverse_cepstral(&re, &mut out[..7]).unwrap_err();
        assert!(matches!(err, FftError::NullArgument { argument: "cepstrum", .. }));
    }

    #[test]
    fn test_unknown_implementation() {
        let registry = Registry::default();
        let err = Fft::with_config(&registry, 8, FftConfig::with_implementation("ipp")).unwrap_err();
        assert_eq!(err, FftError::InvalidImplementation("ipp".to_string()));
    }

    #[test]
    fn test_default_change_does_not_rebind() {
        let mut registry = Registry::default();
        let fft = Fft::with_registry(&registry, 16).unwrap();
        registry.set_default_implementation(RUSTFFT).unwrap();

        assert_eq!(fft.implementation(), REALFFT);
        assert_eq!(Fft::with_registry(&registry, 16).unwrap().implementation(), RUSTFFT);
    }

    #[test]
    fn test_single_promoted_on_double_only_engine() {
        let mut fft = make(RUSTFFT, 8);
        assert!(!fft.supported_precisions().contains(Precision::Single));

        fft.init_single().unwrap();
        assert!(fft.single.is_none());
        assert!(fft.double.is_some());

        let input = [1.0f32, 2.0, 0.0, -1.0, 0.5, 0.0, 0.0, 3.0];
        let mut re = [0.0f32; 5];
        let mut im = [0.0f32; 5];
        fft.forward(&input, &mut re, &mut im).unwrap();

        let mut out = [0.0f32; 8];
        fft.inverse(&re, &im, &mut out).unwrap();
        for (o, x) in out.iter().zip(input) {
            assert!((o - 8.0 * x).abs() < 1e-4);
        }
    }

    struct SingleOnly;

    impl EngineFactory for SingleOnly {
        fn name(&self) -> &str {
            "single-only"
        }

        fn supported_precisions(&self) -> Precisions {
            Precisions::SINGLE
        }

        fn build_single(&self, size: usize) -> Result<Box<dyn Engine<f32>>, FftError> {
            Ok(Box::new(RealFftEngine::<f32>::new(size)))
        }
    }

    #[test]
    fn test_double_demoted_on_single_only_engine() {
        let mut registry = Registry::new();
        registry.register(Arc::new(SingleOnly));
        let mut fft = Fft::with_registry(&registry, 4).unwrap();
        assert_eq!(fft.implementation(), "single-only");

        fft.init_double().unwrap();
        assert!(fft.single.is_some());
        assert!(fft.double.is_none());

        let (re, im) = forward_f64(&mut fft, &[0.5, 1.0, -0.5, -1.0]);
        assert_close(&re, &[0.0, 1.0, 0.0], 1e-6);
        assert_close(&im, &[0.0, -2.0, 0.0], 1e-6);
    }

    struct Failing;

    impl EngineFactory for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn supported_precisions(&self) -> Precisions {
            Precisions::DOUBLE
        }

        fn build_double(&self, _size: usize) -> Result<Box<dyn Engine<f64>>, FftError> {
            Err(FftError::InternalError("no workspace".to_string()))
        }
    }

    #[test]
    fn test_engine_failure_leaves_outputs_untouched() {
        let mut registry = Registry::new();
        registry.register(Arc::new(Failing));
        let mut fft = Fft::with_registry(&registry, 4).unwrap();

        let mut mag = [5.0f64; 3];
        let err = fft.forward_magnitude(&[1.0; 4], &mut mag).unwrap_err();
        assert_eq!(err, FftError::InternalError("no workspace".to_string()));
        assert_eq!(mag, [5.0; 3]);
        assert!(fft.init_double().is_err());
    }

    #[test]
    fn test_accessors() {
        let fft = make(RUSTFFT, 512);
        assert_eq!(fft.size(), 512);
        assert_eq!(fft.bins(), 257);
        assert_eq!(fft.implementation(), RUSTFFT);
        assert_eq!(fft.config().phase, PhaseEstimator::Exact);
        assert!(format!("{:?}", fft).contains("rustfft"));
    }
}
