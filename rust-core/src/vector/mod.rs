//! Elementwise vector math over sample buffers
//!
//! Argument order follows `copy_from_slice`: destination first, then
//! sources, then scalars. Borrowing rules already keep destinations and
//! sources apart; [`v_move`] is the one operation that works within a
//! single, possibly overlapping, buffer.
//!
//! Binary operations work on the common prefix of their arguments, so a
//! caller can target a sub-range simply by slicing.

pub mod layout;
pub mod ops;
pub mod portable;
pub mod simd;

pub use layout::*;
pub use ops::*;
pub use simd::Strategy;

use num_traits::NumAssign;
use std::fmt::Debug;

/// Numeric element type accepted by the vector kernels.
///
/// The `accelerated_*` hooks return `false` when no accelerated path ran,
/// in which case the caller falls back to [`portable`]. Only `f32` and
/// `f64` override them.
pub trait Sample: Copy + Default + PartialOrd + NumAssign + Debug + Send + Sync + 'static {
    #[inline]
    fn accelerated_add(_dst: &mut [Self], _src: &[Self]) -> bool {
        false
    }

    #[inline]
    fn accelerated_subtract(_dst: &mut [Self], _src: &[Self]) -> bool {
        false
    }

    #[inline]
    fn accelerated_multiply(_dst: &mut [Self], _src: &[Self]) -> bool {
        false
    }

    #[inline]
    fn accelerated_multiply_to(_dst: &mut [Self], _src1: &[Self], _src2: &[Self]) -> bool {
        false
    }

    #[inline]
    fn accelerated_multiply_and_add(_dst: &mut [Self], _src1: &[Self], _src2: &[Self]) -> bool {
        false
    }

    #[inline]
    fn accelerated_scale(_dst: &mut [Self], _gain: Self) -> bool {
        false
    }

    #[inline]
    fn accelerated_add_with_gain(_dst: &mut [Self], _src: &[Self], _gain: Self) -> bool {
        false
    }
}

impl Sample for i8 {}
impl Sample for i16 {}
impl Sample for i32 {}
impl Sample for i64 {}
impl Sample for u8 {}
impl Sample for u16 {}
impl Sample for u32 {}
impl Sample for u64 {}

impl Sample for f32 {
    fn accelerated_add(dst: &mut [f32], src: &[f32]) -> bool {
        simd::try_add_f32(dst, src)
    }

    fn accelerated_subtract(dst: &mut [f32], src: &[f32]) -> bool {
        simd::try_subtract_f32(dst, src)
    }

    fn accelerated_multiply(dst: &mut [f32], src: &[f32]) -> bool {
        simd::try_multiply_f32(dst, src)
    }

    fn accelerated_multiply_to(dst: &mut [f32], src1: &[f32], src2: &[f32]) -> bool {
        simd::try_multiply_to_f32(dst, src1, src2)
    }

    fn accelerated_multiply_and_add(dst: &mut [f32], src1: &[f32], src2: &[f32]) -> bool {
        simd::try_multiply_and_add_f32(dst, src1, src2)
    }

    fn accelerated_scale(dst: &mut [f32], gain: f32) -> bool {
        simd::try_scale_f32(dst, gain)
    }

    fn accelerated_add_with_gain(dst: &mut [f32], src: &[f32], gain: f32) -> bool {
        simd::try_add_with_gain_f32(dst, src, gain)
    }
}

impl Sample for f64 {
    fn accelerated_add(dst: &mut [f64], src: &[f64]) -> bool {
        simd::try_add_f64(dst, src)
    }

    fn accelerated_subtract(dst: &mut [f64], src: &[f64]) -> bool {
        simd::try_subtract_f64(dst, src)
    }

    fn accelerated_multiply(dst: &mut [f64], src: &[f64]) -> bool {
        simd::try_multiply_f64(dst, src)
    }

    fn accelerated_multiply_to(dst: &mut [f64], src1: &[f64], src2: &[f64]) -> bool {
        simd::try_multiply_to_f64(dst, src1, src2)
    }

    fn accelerated_multiply_and_add(dst: &mut [f64], src1: &[f64], src2: &[f64]) -> bool {
        simd::try_multiply_and_add_f64(dst, src1, src2)
    }

    fn accelerated_scale(dst: &mut [f64], gain: f64) -> bool {
        simd::try_scale_f64(dst, gain)
    }

    fn accelerated_add_with_gain(dst: &mut [f64], src: &[f64], gain: f64) -> bool {
        simd::try_add_with_gain_f64(dst, src, gain)
    }
}
