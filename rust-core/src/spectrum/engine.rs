//! Backend engine contract
//!
//! An engine computes the raw, unscaled real transform for one fixed size
//! and one precision. Engines are produced by an [`EngineFactory`], which
//! is what gets registered under an implementation name.

use std::fmt;

use super::FftError;

/// Floating-point precision of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => write!(f, "single"),
            Precision::Double => write!(f, "double"),
        }
    }
}

/// Set of precisions an engine computes natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precisions {
    single: bool,
    double: bool,
}

impl Precisions {
    pub const SINGLE: Precisions = Precisions { single: true, double: false };
    pub const DOUBLE: Precisions = Precisions { single: false, double: true };
    pub const BOTH: Precisions = Precisions { single: true, double: true };

    pub fn contains(self, precision: Precision) -> bool {
        match precision {
            Precision::Single => self.single,
            Precision::Double => self.double,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.single && !self.double
    }
}

/// Raw transform for one size and one precision.
///
/// Callers pass slices of exactly `size` time-domain samples and
/// `size / 2 + 1` bins. `forward` writes every bin including the
/// imaginary parts of DC and Nyquist; `inverse` ignores those two
/// imaginary parts.
pub trait Engine<T>: Send {
    fn forward(&mut self, input: &[T], re: &mut [T], im: &mut [T]) -> Result<(), FftError>;

    fn inverse(&mut self, re: &[T], im: &[T], output: &mut [T]) -> Result<(), FftError>;
}

/// Named constructor of engines.
///
/// Only the `build_*` methods matching [`supported_precisions`] are ever
/// called by the façade.
///
/// [`supported_precisions`]: EngineFactory::supported_precisions
pub trait EngineFactory: Send + Sync {
    fn name(&self) -> &str;

    fn supported_precisions(&self) -> Precisions;

    fn build_single(&self, size: usize) -> Result<Box<dyn Engine<f32>>, FftError> {
        Err(FftError::InternalError(format!(
            "{} has no single-precision engine (size {})",
            self.name(),
            size
        )))
    }

    fn build_double(&self, size: usize) -> Result<Box<dyn Engine<f64>>, FftError> {
        Err(FftError::InternalError(format!(
            "{} has no double-precision engine (size {})",
            self.name(),
            size
        )))
    }
}
