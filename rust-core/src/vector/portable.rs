//! Reference loops for the accelerated kernels
//!
//! These define the semantics: index order 0..n over the common prefix of
//! the arguments. Accelerated versions must agree with them.

use super::Sample;

pub fn add<T: Sample>(dst: &mut [T], src: &[T]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

pub fn subtract<T: Sample>(dst: &mut [T], src: &[T]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d -= s;
    }
}

pub fn multiply<T: Sample>(dst: &mut [T], src: &[T]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d *= s;
    }
}

pub fn multiply_to<T: Sample>(dst: &mut [T], src1: &[T], src2: &[T]) {
    for ((d, &a), &b) in dst.iter_mut().zip(src1).zip(src2) {
        *d = a * b;
    }
}

pub fn multiply_and_add<T: Sample>(dst: &mut [T], src1: &[T], src2: &[T]) {
    for ((d, &a), &b) in dst.iter_mut().zip(src1).zip(src2) {
        *d += a * b;
    }
}

pub fn scale<T: Sample>(dst: &mut [T], gain: T) {
    for d in dst.iter_mut() {
        *d *= gain;
    }
}

pub fn add_with_gain<T: Sample>(dst: &mut [T], src: &[T], gain: T) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s * gain;
    }
}
