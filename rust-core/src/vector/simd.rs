//! Runtime-selected accelerated kernels
//!
//! The strategy is detected once, on first use, from the running CPU.
//! Every function here has a portable twin in [`super::portable`] and
//! must produce bit-identical results to it: the kernels only use
//! elementwise add/sub/mul (no fused multiply-add), so lane order does not
//! change rounding.

use std::sync::OnceLock;

use tracing::debug;

/// Kernel implementation family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Plain loops, available everywhere
    Portable,

    /// 256-bit AVX lanes (x86/x86_64 only)
    Avx,
}

impl Strategy {
    /// Probe the running CPU
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx") {
                return Strategy::Avx;
            }
        }

        Strategy::Portable
    }

    /// Strategy used by the dispatching kernels, detected once per process
    pub fn active() -> Self {
        static ACTIVE: OnceLock<Strategy> = OnceLock::new();
        *ACTIVE.get_or_init(|| {
            let strategy = Strategy::detect();
            debug!(?strategy, "vector kernel strategy selected");
            strategy
        })
    }
}

macro_rules! dispatch_binary {
    ($try_name:ident, $kernel:ident, $t:ty) => {
        pub(crate) fn $try_name(dst: &mut [$t], src: &[$t]) -> bool {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            {
                if Strategy::active() == Strategy::Avx {
                    // SAFETY: AVX availability was checked at detection
                    unsafe { avx::$kernel(dst, src) };
                    return true;
                }
            }
            let _ = (dst, src);
            false
        }
    };
}

macro_rules! dispatch_ternary {
    ($try_name:ident, $kernel:ident, $t:ty) => {
        pub(crate) fn $try_name(dst: &mut [$t], src1: &[$t], src2: &[$t]) -> bool {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            {
                if Strategy::active() == Strategy::Avx {
                    // SAFETY: AVX availability was checked at detection
                    unsafe { avx::$kernel(dst, src1, src2) };
                    return true;
                }
            }
            let _ = (dst, src1, src2);
            false
        }
    };
}

macro_rules! dispatch_scalar {
    ($try_name:ident, $kernel:ident, $t:ty) => {
        pub(crate) fn $try_name(dst: &mut [$t], gain: $t) -> bool {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            {
                if Strategy::active() == Strategy::Avx {
                    // SAFETY: AVX availability was checked at detection
                    unsafe { avx::$kernel(dst, gain) };
                    return true;
                }
            }
            let _ = (dst, gain);
            false
        }
    };
}

macro_rules! dispatch_gain {
    ($try_name:ident, $kernel:ident, $t:ty) => {
        pub(crate) fn $try_name(dst: &mut [$t], src: &[$t], gain: $t) -> bool {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            {
                if Strategy::active() == Strategy::Avx {
                    // SAFETY: AVX availability was checked at detection
                    unsafe { avx::$kernel(dst, src, gain) };
                    return true;
                }
            }
            let _ = (dst, src, gain);
            false
        }
    };
}

dispatch_binary!(try_add_f32, add_f32, f32);
dispatch_binary!(try_add_f64, add_f64, f64);
dispatch_binary!(try_subtract_f32, subtract_f32, f32);
dispatch_binary!(try_subtract_f64, subtract_f64, f64);
dispatch_binary!(try_multiply_f32, multiply_f32, f32);
dispatch_binary!(try_multiply_f64, multiply_f64, f64);
dispatch_ternary!(try_multiply_to_f32, multiply_to_f32, f32);
dispatch_ternary!(try_multiply_to_f64, multiply_to_f64, f64);
dispatch_ternary!(try_multiply_and_add_f32, multiply_and_add_f32, f32);
dispatch_ternary!(try_multiply_and_add_f64, multiply_and_add_f64, f64);
dispatch_scalar!(try_scale_f32, scale_f32, f32);
dispatch_scalar!(try_scale_f64, scale_f64, f64);
dispatch_gain!(try_add_with_gain_f32, add_with_gain_f32, f32);
dispatch_gain!(try_add_with_gain_f64, add_with_gain_f64, f64);

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod avx {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    // dst[i] = dst[i] op src[i]
    macro_rules! binary_kernel {
        ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $vop:ident, $op:tt) => {
            #[target_feature(enable = "avx")]
            pub unsafe fn $name(dst: &mut [$t], src: &[$t]) {
                let n = dst.len().min(src.len());
                let body = n - n % $lanes;
                let mut i = 0;
                while i < body {
                    let a = $load(dst.as_ptr().add(i));
                    let b = $load(src.as_ptr().add(i));
                    $store(dst.as_mut_ptr().add(i), $vop(a, b));
                    i += $lanes;
                }
                for j in body..n {
                    dst[j] = dst[j] $op src[j];
                }
            }
        };
    }

    binary_kernel!(add_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_add_ps, +);
    binary_kernel!(add_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_add_pd, +);
    binary_kernel!(subtract_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_sub_ps, -);
    binary_kernel!(subtract_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_sub_pd, -);
    binary_kernel!(multiply_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_mul_ps, *);
    binary_kernel!(multiply_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_mul_pd, *);

    // dst[i] = src1[i] * src2[i]
    macro_rules! multiply_to_kernel {
        ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $mul:ident) => {
            #[target_feature(enable = "avx")]
            pub unsafe fn $name(dst: &mut [$t], src1: &[$t], src2: &[$t]) {
                let n = dst.len().min(src1.len()).min(src2.len());
                let body = n - n % $lanes;
                let mut i = 0;
                while i < body {
                    let a = $load(src1.as_ptr().add(i));
                    let b = $load(src2.as_ptr().add(i));
                    $store(dst.as_mut_ptr().add(i), $mul(a, b));
                    i += $lanes;
                }
                for j in body..n {
                    dst[j] = src1[j] * src2[j];
                }
            }
        };
    }

    multiply_to_kernel!(multiply_to_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_mul_ps);
    multiply_to_kernel!(multiply_to_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_mul_pd);

    // dst[i] += src1[i] * src2[i]
    macro_rules! multiply_and_add_kernel {
        ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $add:ident, $mul:ident) => {
            #[target_feature(enable = "avx")]
            pub unsafe fn $name(dst: &mut [$t], src1: &[$t], src2: &[$t]) {
                let n = dst.len().min(src1.len()).min(src2.len());
                let body = n - n % $lanes;
                let mut i = 0;
                while i < body {
                    let d = $load(dst.as_ptr().add(i));
                    let a = $load(src1.as_ptr().add(i));
                    let b = $load(src2.as_ptr().add(i));
                    $store(dst.as_mut_ptr().add(i), $add(d, $mul(a, b)));
                    i += $lanes;
                }
                for j in body..n {
                    dst[j] += src1[j] * src2[j];
                }
            }
        };
    }

    multiply_and_add_kernel!(multiply_and_add_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_add_ps, _mm256_mul_ps);
    multiply_and_add_kernel!(multiply_and_add_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_add_pd, _mm256_mul_pd);

    // dst[i] *= gain
    macro_rules! scale_kernel {
        ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $splat:ident, $mul:ident) => {
            #[target_feature(enable = "avx")]
            pub unsafe fn $name(dst: &mut [$t], gain: $t) {
                let n = dst.len();
                let body = n - n % $lanes;
                let g = $splat(gain);
                let mut i = 0;
                while i < body {
                    let d = $load(dst.as_ptr().add(i));
                    $store(dst.as_mut_ptr().add(i), $mul(d, g));
                    i += $lanes;
                }
                for x in &mut dst[body..n] {
                    *x *= gain;
                }
            }
        };
    }

    scale_kernel!(scale_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps, _mm256_mul_ps);
    scale_kernel!(scale_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd, _mm256_mul_pd);

    // dst[i] += src[i] * gain
    macro_rules! add_with_gain_kernel {
        ($name:ident, $t:ty, $lanes:expr, $load:ident, $store:ident, $splat:ident, $add:ident, $mul:ident) => {
            #[target_feature(enable = "avx")]
            pub unsafe fn $name(dst: &mut [$t], src: &[$t], gain: $t) {
                let n = dst.len().min(src.len());
                let body = n - n % $lanes;
                let g = $splat(gain);
                let mut i = 0;
                while i < body {
                    let d = $load(dst.as_ptr().add(i));
                    let s = $load(src.as_ptr().add(i));
                    $store(dst.as_mut_ptr().add(i), $add(d, $mul(s, g)));
                    i += $lanes;
                }
                for j in body..n {
                    dst[j] += src[j] * gain;
                }
            }
        };
    }

    add_with_gain_kernel!(add_with_gain_f32, f32, 8, _mm256_loadu_ps, _mm256_storeu_ps, _mm256_set1_ps, _mm256_add_ps, _mm256_mul_ps);
    add_with_gain_kernel!(add_with_gain_f64, f64, 4, _mm256_loadu_pd, _mm256_storeu_pd, _mm256_set1_pd, _mm256_add_pd, _mm256_mul_pd);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::portable;

    fn ramp_f64(n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.37 + offset).sin() * 3.0).collect()
    }

    fn ramp_f32(n: usize, offset: f32) -> Vec<f32> {
        (0..n).map(|i| (i as f32 * 0.37 + offset).sin() * 3.0).collect()
    }

    #[test]
    fn test_detection_is_stable() {
        assert_eq!(Strategy::active(), Strategy::active());
        let detected = Strategy::detect();
        assert!(matches!(detected, Strategy::Portable | Strategy::Avx));
    }

    #[test]
    fn test_accelerated_matches_portable_f64() {
        // Odd lengths exercise the scalar tail
        for n in [0, 1, 3, 4, 5, 16, 37] {
            let src = ramp_f64(n, 1.0);
            let other = ramp_f64(n, 2.0);

            let mut fast = ramp_f64(n, 0.0);
            let mut slow = fast.clone();
            if try_add_f64(&mut fast, &src) {
                portable::add(&mut slow, &src);
                assert_eq!(fast, slow);
            }

            let mut fast = ramp_f64(n, 0.0);
            let mut slow = fast.clone();
            if try_multiply_and_add_f64(&mut fast, &src, &other) {
                portable::multiply_and_add(&mut slow, &src, &other);
                assert_eq!(fast, slow);
            }

            let mut fast = ramp_f64(n, 0.0);
            let mut slow = fast.clone();
            if try_add_with_gain_f64(&mut fast, &src, 0.25) {
                portable::add_with_gain(&mut slow, &src, 0.25);
                assert_eq!(fast, slow);
            }
        }
    }

    #[test]
    fn test_accelerated_matches_portable_f32() {
        for n in [0, 1, 7, 8, 9, 33] {
            let src = ramp_f32(n, 1.0);
            let other = ramp_f32(n, 2.0);

            let mut fast = ramp_f32(n, 0.0);
            let mut slow = fast.clone();
            if try_subtract_f32(&mut fast, &src) {
                portable::subtract(&mut slow, &src);
                assert_eq!(fast, slow);
            }

            let mut fast = vec![0.0f32; n];
            let mut slow = fast.clone();
            if try_multiply_to_f32(&mut fast, &src, &other) {
                portable::multiply_to(&mut slow, &src, &other);
                assert_eq!(fast, slow);
            }

            let mut fast = ramp_f32(n, 0.0);
            let mut slow = fast.clone();
            if try_scale_f32(&mut fast, -1.5) {
                portable::scale(&mut slow, -1.5);
                assert_eq!(fast, slow);
            }
        }
    }
}
