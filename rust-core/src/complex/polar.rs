//! Cartesian and polar conversions
//!
//! Phase of a zero-magnitude sample is whatever the arctangent returns for
//! `(0, 0)`; it is passed through untouched.

use num_complex::Complex;
use num_traits::{AsPrimitive, Float};

use super::PhaseEstimator;
use crate::vector::Sample;

/// Four-quadrant arctangent approximation.
///
/// Maximum absolute error against `im.atan2(re)` is below 0.005 rad. Along
/// the negative real axis the result may be `π` where the exact form gives
/// `-π`.
pub fn approximate_atan2<T: Float>(im: T, re: T) -> T {
    let zero = T::zero();
    let pi = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let half_pi = T::from(std::f64::consts::FRAC_PI_2).unwrap_or_else(T::zero);
    let k = T::from(0.28).unwrap_or_else(T::zero);

    if re == zero {
        return if im > zero {
            half_pi
        } else if im < zero {
            -half_pi
        } else {
            zero
        };
    }

    let z = im / re;
    if z.abs() < T::one() {
        let atan = z / (T::one() + k * z * z);
        if re < zero {
            if im < zero {
                atan - pi
            } else {
                atan + pi
            }
        } else {
            atan
        }
    } else {
        let atan = half_pi - z / (z * z + k);
        if im < zero {
            atan - pi
        } else {
            atan
        }
    }
}

/// Unit-magnitude sample at `phase` radians
#[inline]
pub fn c_phasor<T: Float>(phase: T) -> Complex<T> {
    let (sin, cos) = phase.sin_cos();
    Complex::new(cos, sin)
}

/// `(magnitude, phase)` of `re + i·im` with the exact arctangent
#[inline]
pub fn c_magphase<T: Float>(re: T, im: T) -> (T, T) {
    c_magphase_with(PhaseEstimator::Exact, re, im)
}

/// `(magnitude, phase)` of `re + i·im` with the given estimator
#[inline]
pub fn c_magphase_with<T: Float>(estimator: PhaseEstimator, re: T, im: T) -> (T, T) {
    ((re * re + im * im).sqrt(), estimator.phase(im, re))
}

/// Split polar to split cartesian
pub fn v_polar_to_cartesian<S, T>(re: &mut [T], im: &mut [T], mag: &[S], phase: &[S])
where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    let dst = re.iter_mut().zip(im.iter_mut());
    for ((r, i), (&m, &p)) in dst.zip(mag.iter().zip(phase)) {
        let c = c_phasor(p) * m;
        *r = c.re.as_();
        *i = c.im.as_();
    }
}

/// Split polar to complex samples
pub fn v_polar_to_cartesian_complex<T: Float>(dst: &mut [Complex<T>], mag: &[T], phase: &[T]) {
    for (d, (&m, &p)) in dst.iter_mut().zip(mag.iter().zip(phase)) {
        *d = c_phasor(p) * m;
    }
}

/// Interleaved `(mag, phase)` pairs to complex samples
pub fn v_polar_interleaved_to_cartesian<T: Float>(dst: &mut [Complex<T>], src: &[T]) {
    for (d, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *d = c_phasor(pair[1]) * pair[0];
    }
}

/// Split polar to interleaved `(re, im)` pairs
pub fn v_polar_to_cartesian_interleaved<S, T>(dst: &mut [T], mag: &[S], phase: &[S])
where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    for (pair, (&m, &p)) in dst.chunks_exact_mut(2).zip(mag.iter().zip(phase)) {
        let c = c_phasor(p) * m;
        pair[0] = c.re.as_();
        pair[1] = c.im.as_();
    }
}

/// Rewrite `(mag, phase)` pairs as `(re, im)` pairs in place
pub fn v_polar_interleaved_to_cartesian_inplace<T: Float>(buf: &mut [T]) {
    for pair in buf.chunks_exact_mut(2) {
        let c = c_phasor(pair[1]) * pair[0];
        pair[0] = c.re;
        pair[1] = c.im;
    }
}

/// Split cartesian to split polar with the exact arctangent
pub fn v_cartesian_to_polar<S, T>(mag: &mut [T], phase: &mut [T], re: &[S], im: &[S])
where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    v_cartesian_to_polar_with(PhaseEstimator::Exact, mag, phase, re, im);
}

/// Split cartesian to split polar with the given estimator
pub fn v_cartesian_to_polar_with<S, T>(
    estimator: PhaseEstimator,
    mag: &mut [T],
    phase: &mut [T],
    re: &[S],
    im: &[S],
) where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    let dst = mag.iter_mut().zip(phase.iter_mut());
    for ((m, p), (&r, &i)) in dst.zip(re.iter().zip(im)) {
        let (mm, pp) = c_magphase_with(estimator, r, i);
        *m = mm.as_();
        *p = pp.as_();
    }
}

/// Complex samples to split polar
pub fn v_cartesian_complex_to_polar<T: Float>(mag: &mut [T], phase: &mut [T], src: &[Complex<T>]) {
    let dst = mag.iter_mut().zip(phase.iter_mut());
    for ((m, p), c) in dst.zip(src) {
        let (mm, pp) = c_magphase(c.re, c.im);
        *m = mm;
        *p = pp;
    }
}

/// Complex samples to interleaved `(mag, phase)` pairs
pub fn v_cartesian_to_polar_interleaved<T: Float>(dst: &mut [T], src: &[Complex<T>]) {
    for (pair, c) in dst.chunks_exact_mut(2).zip(src) {
        let (m, p) = c_magphase(c.re, c.im);
        pair[0] = m;
        pair[1] = p;
    }
}

/// Interleaved `(re, im)` pairs to split polar
pub fn v_cartesian_interleaved_to_polar<S, T>(mag: &mut [T], phase: &mut [T], src: &[S])
where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    let dst = mag.iter_mut().zip(phase.iter_mut());
    for ((m, p), pair) in dst.zip(src.chunks_exact(2)) {
        let (mm, pp) = c_magphase(pair[0], pair[1]);
        *m = mm.as_();
        *p = pp.as_();
    }
}

/// Rewrite `(re, im)` pairs as `(mag, phase)` pairs in place
pub fn v_cartesian_to_polar_interleaved_inplace<T: Float>(buf: &mut [T]) {
    for pair in buf.chunks_exact_mut(2) {
        let (m, p) = c_magphase(pair[0], pair[1]);
        pair[0] = m;
        pair[1] = p;
    }
}

/// Magnitudes only; no phase is computed
pub fn v_cartesian_to_magnitudes<S, T>(mag: &mut [T], re: &[S], im: &[S])
where
    S: Sample + Float + AsPrimitive<T>,
    T: Sample,
{
    for (m, (&r, &i)) in mag.iter_mut().zip(re.iter().zip(im)) {
        *m = (r * r + i * i).sqrt().as_();
    }
}
