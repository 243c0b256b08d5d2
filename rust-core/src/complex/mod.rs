//! Complex sample algebra and cartesian/polar conversion
//!
//! Samples are [`num_complex::Complex`]. Vector operations that share a
//! name with the real-valued kernel (`v_add`, `v_multiply`, ...) live here
//! and are meant to be called module-qualified, e.g. `complex::v_add`.

pub mod arithmetic;
pub mod polar;

pub use arithmetic::*;
pub use polar::*;

use num_traits::Float;

/// How phase is computed when converting cartesian samples to polar form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseEstimator {
    /// `atan2` from the standard library
    #[default]
    Exact,
    /// [`approximate_atan2`], faster but within 0.005 rad
    Approximate,
}

impl PhaseEstimator {
    /// Phase of `re + i·im`
    #[inline]
    pub fn phase<T: Float>(self, im: T, re: T) -> T {
        match self {
            PhaseEstimator::Exact => im.atan2(re),
            PhaseEstimator::Approximate => approximate_atan2(im, re),
        }
    }
}
