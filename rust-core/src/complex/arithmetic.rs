//! Complex sample algebra and layout conversions
//!
//! Complex products use the four-multiply form
//! `(a + bi)(c + di) = (ac - bd) + (ad + bc)i`.

use num_complex::Complex;
use num_traits::{AsPrimitive, Float};

use crate::vector::Sample;

/// `dst += src`
#[inline]
pub fn c_add<T: Float>(dst: &mut Complex<T>, src: Complex<T>) {
    dst.re = dst.re + src.re;
    dst.im = dst.im + src.im;
}

/// `dst += src * gain`
#[inline]
pub fn c_add_with_gain<T: Float>(dst: &mut Complex<T>, src: Complex<T>, gain: T) {
    dst.re = dst.re + src.re * gain;
    dst.im = dst.im + src.im * gain;
}

/// `src1 * src2`
#[inline]
pub fn c_multiply<T: Float>(src1: Complex<T>, src2: Complex<T>) -> Complex<T> {
    let re = src1.re * src2.re - src1.im * src2.im;
    let im = src1.re * src2.im + src1.im * src2.re;
    Complex::new(re, im)
}

/// `dst *= src`
#[inline]
pub fn c_multiply_in_place<T: Float>(dst: &mut Complex<T>, src: Complex<T>) {
    *dst = c_multiply(*dst, src);
}

/// `dst += src1 * src2`
#[inline]
pub fn c_multiply_and_add<T: Float>(dst: &mut Complex<T>, src1: Complex<T>, src2: Complex<T>) {
    c_add(dst, c_multiply(src1, src2));
}

/// Set every complex element to zero
pub fn v_zero<T: Float>(dst: &mut [Complex<T>]) {
    dst.fill(Complex::new(T::zero(), T::zero()));
}

/// `dst[i] += src[i]`
pub fn v_add<T: Float>(dst: &mut [Complex<T>], src: &[Complex<T>]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        c_add(d, s);
    }
}

/// `dst[i] += src[i] * gain`
pub fn v_add_with_gain<T: Float>(dst: &mut [Complex<T>], src: &[Complex<T>], gain: T) {
    for (d, &s) in dst.iter_mut().zip(src) {
        c_add_with_gain(d, s, gain);
    }
}

/// `dst[i] *= src[i]`
pub fn v_multiply<T: Float>(dst: &mut [Complex<T>], src: &[Complex<T>]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        c_multiply_in_place(d, s);
    }
}

/// `dst[i] = src1[i] * src2[i]`
pub fn v_multiply_to<T: Float>(dst: &mut [Complex<T>], src1: &[Complex<T>], src2: &[Complex<T>]) {
    for ((d, &a), &b) in dst.iter_mut().zip(src1).zip(src2) {
        *d = c_multiply(a, b);
    }
}

/// `dst[i] += src1[i] * src2[i]`
pub fn v_multiply_and_add<T: Float>(dst: &mut [Complex<T>], src1: &[Complex<T>], src2: &[Complex<T>]) {
    for ((d, &a), &b) in dst.iter_mut().zip(src1).zip(src2) {
        c_multiply_and_add(d, a, b);
    }
}

/// Read `(re, im)` pairs from `src` into complex samples
pub fn v_complex_from_interleaved<T: Float>(dst: &mut [Complex<T>], src: &[T]) {
    for (d, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *d = Complex::new(pair[0], pair[1]);
    }
}

/// Write complex samples out as `(re, im)` pairs
pub fn v_interleaved_from_complex<T: Float>(dst: &mut [T], src: &[Complex<T>]) {
    for (pair, s) in dst.chunks_exact_mut(2).zip(src) {
        pair[0] = s.re;
        pair[1] = s.im;
    }
}

/// Pack split real/imaginary buffers as `(re, im)` pairs, converting type
pub fn v_split_to_interleaved<S, T>(dst: &mut [T], re: &[S], im: &[S])
where
    S: Sample + AsPrimitive<T>,
    T: Sample,
{
    for ((pair, &r), &i) in dst.chunks_exact_mut(2).zip(re).zip(im) {
        pair[0] = r.as_();
        pair[1] = i.as_();
    }
}

/// Unpack `(re, im)` pairs into split buffers, converting type
pub fn v_interleaved_to_split<S, T>(re: &mut [T], im: &mut [T], src: &[S])
where
    S: Sample + AsPrimitive<T>,
    T: Sample,
{
    for ((r, i), pair) in re.iter_mut().zip(im.iter_mut()).zip(src.chunks_exact(2)) {
        *r = pair[0].as_();
        *i = pair[1].as_();
    }
}
