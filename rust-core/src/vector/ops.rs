//! Fill, copy, arithmetic, reductions and unary transforms

use std::ops::Range;

use num_traits::{AsPrimitive, Float, Signed};

use super::{portable, Sample};

/// Set every element to zero
pub fn v_zero<T: Sample>(dst: &mut [T]) {
    dst.fill(T::zero());
}

/// Set every element to `value`
pub fn v_set<T: Sample>(dst: &mut [T], value: T) {
    dst.fill(value);
}

/// Copy `src` into the front of `dst`
pub fn v_copy<T: Sample>(dst: &mut [T], src: &[T]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

/// Copy `buf[src]` to `buf[dst_start..]`; the two ranges may overlap.
///
/// # Panics
/// If either range falls outside `buf`.
pub fn v_move<T: Sample>(buf: &mut [T], src: Range<usize>, dst_start: usize) {
    buf.copy_within(src, dst_start);
}

/// Copy with element type conversion (widening or truncating cast)
pub fn v_convert<S, T>(dst: &mut [T], src: &[S])
where
    S: Sample + AsPrimitive<T>,
    T: Sample,
{
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s.as_();
    }
}

/// `dst[i] += src[i]`
pub fn v_add<T: Sample>(dst: &mut [T], src: &[T]) {
    if !T::accelerated_add(dst, src) {
        portable::add(dst, src);
    }
}

/// `dst[i] += value`
pub fn v_add_scalar<T: Sample>(dst: &mut [T], value: T) {
    for d in dst.iter_mut() {
        *d += value;
    }
}

/// `dst[i] += src[i] * gain`
pub fn v_add_with_gain<T: Sample>(dst: &mut [T], src: &[T], gain: T) {
    if !T::accelerated_add_with_gain(dst, src, gain) {
        portable::add_with_gain(dst, src, gain);
    }
}

/// `dst[i] -= src[i]`
pub fn v_subtract<T: Sample>(dst: &mut [T], src: &[T]) {
    if !T::accelerated_subtract(dst, src) {
        portable::subtract(dst, src);
    }
}

/// `dst[i] -= value`
pub fn v_subtract_scalar<T: Sample>(dst: &mut [T], value: T) {
    for d in dst.iter_mut() {
        *d -= value;
    }
}

/// `dst[i] *= gain`
pub fn v_scale<T: Sample>(dst: &mut [T], gain: T) {
    if !T::accelerated_scale(dst, gain) {
        portable::scale(dst, gain);
    }
}

/// `dst[i] *= src[i]`
pub fn v_multiply<T: Sample>(dst: &mut [T], src: &[T]) {
    if !T::accelerated_multiply(dst, src) {
        portable::multiply(dst, src);
    }
}

/// `dst[i] = src1[i] * src2[i]`
pub fn v_multiply_to<T: Sample>(dst: &mut [T], src1: &[T], src2: &[T]) {
    if !T::accelerated_multiply_to(dst, src1, src2) {
        portable::multiply_to(dst, src1, src2);
    }
}

/// `dst[i] /= src[i]`
pub fn v_divide<T: Sample>(dst: &mut [T], src: &[T]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d /= s;
    }
}

/// `dst[i] /= value`
pub fn v_divide_scalar<T: Sample>(dst: &mut [T], value: T) {
    for d in dst.iter_mut() {
        *d /= value;
    }
}

/// `dst[i] += src1[i] * src2[i]`
pub fn v_multiply_and_add<T: Sample>(dst: &mut [T], src1: &[T], src2: &[T]) {
    if !T::accelerated_multiply_and_add(dst, src1, src2) {
        portable::multiply_and_add(dst, src1, src2);
    }
}

/// Sum of all elements
pub fn v_sum<T: Sample>(src: &[T]) -> T {
    src.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// Dot product of the common prefix of `src1` and `src2`
pub fn v_multiply_and_sum<T: Sample>(src1: &[T], src2: &[T]) -> T {
    src1.iter()
        .zip(src2)
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

/// Natural log, in place
pub fn v_log<T: Sample + Float>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        *d = d.ln();
    }
}

/// Exponential, in place
pub fn v_exp<T: Sample + Float>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        *d = d.exp();
    }
}

/// Square root, in place
pub fn v_sqrt<T: Sample + Float>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        *d = d.sqrt();
    }
}

/// Square, in place
pub fn v_square<T: Sample>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        *d = *d * *d;
    }
}

/// Absolute value, in place
pub fn v_abs<T: Sample + Signed>(dst: &mut [T]) {
    for d in dst.iter_mut() {
        *d = d.abs();
    }
}

/// Arithmetic mean. An empty buffer yields NaN.
pub fn v_mean<T: Sample + Float>(src: &[T]) -> T {
    match T::from(src.len()) {
        Some(n) => v_sum(src) / n,
        None => T::nan(),
    }
}
