//! AVX2 (256-bit) SIMD kernel for x86_64 scoring reductions.
//!
//! Processes 8 `f32` lanes per step and falls through to scalar code for
//! tail elements that don't fill a full register.

use super::{IsaLevel, ScoreKernel};

/// AVX2-accelerated scoring kernel.
#[derive(Debug, Clone, Copy)]
pub struct Avx2Kernel;

#[cfg(target_arch = "x86_64")]
const LANES: usize = 8;

#[cfg(target_arch = "x86_64")]
impl ScoreKernel for Avx2Kernel {
    fn isa_level(&self) -> IsaLevel {
        IsaLevel::Avx2
    }

    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");

        if is_x86_feature_detected!("avx2") {
            // Safety: AVX2 is confirmed at runtime and every load stays
            // within `a.len()`, which all operands share.
            unsafe { self.dot_avx2(a, b) }
        } else {
            super::generic::GenericKernel.dot(a, b)
        }
    }

    fn triple_dot(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");
        assert_eq!(a.len(), c.len(), "kernel operand lengths differ");

        if is_x86_feature_detected!("avx2") {
            unsafe { self.triple_dot_avx2(a, b, c) }
        } else {
            super::generic::GenericKernel.triple_dot(a, b, c)
        }
    }

    fn translation_sq_dist(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");
        assert_eq!(a.len(), c.len(), "kernel operand lengths differ");

        if is_x86_feature_detected!("avx2") {
            unsafe { self.translation_sq_dist_avx2(a, b, c) }
        } else {
            super::generic::GenericKernel.translation_sq_dist(a, b, c)
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl Avx2Kernel {
    #[target_feature(enable = "avx2")]
    unsafe fn dot_avx2(&self, a: &[f32], b: &[f32]) -> f32 {
        use std::arch::x86_64::*;

        let len = a.len();
        let chunks = len / LANES;

        let mut acc;
        unsafe {
            acc = _mm256_setzero_ps();
            for i in 0..chunks {
                let offset = i * LANES;
                let va = _mm256_loadu_ps(a.as_ptr().add(offset));
                let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
                acc = _mm256_add_ps(acc, _mm256_mul_ps(va, vb));
            }
        }

        let mut sum = unsafe { hsum_ps(acc) };
        for i in chunks * LANES..len {
            sum += a[i] * b[i];
        }
        sum
    }

    #[target_feature(enable = "avx2")]
    unsafe fn triple_dot_avx2(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        use std::arch::x86_64::*;

        let len = a.len();
        let chunks = len / LANES;

        let mut acc;
        unsafe {
            acc = _mm256_setzero_ps();
            for i in 0..chunks {
                let offset = i * LANES;
                let va = _mm256_loadu_ps(a.as_ptr().add(offset));
                let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
                let vc = _mm256_loadu_ps(c.as_ptr().add(offset));
                acc = _mm256_add_ps(acc, _mm256_mul_ps(_mm256_mul_ps(va, vb), vc));
            }
        }

        let mut sum = unsafe { hsum_ps(acc) };
        for i in chunks * LANES..len {
            sum += a[i] * b[i] * c[i];
        }
        sum
    }

    #[target_feature(enable = "avx2")]
    unsafe fn translation_sq_dist_avx2(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        use std::arch::x86_64::*;

        let len = a.len();
        let chunks = len / LANES;

        let mut acc;
        unsafe {
            acc = _mm256_setzero_ps();
            for i in 0..chunks {
                let offset = i * LANES;
                let va = _mm256_loadu_ps(a.as_ptr().add(offset));
                let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
                let vc = _mm256_loadu_ps(c.as_ptr().add(offset));
                let d = _mm256_sub_ps(_mm256_add_ps(va, vb), vc);
                acc = _mm256_add_ps(acc, _mm256_mul_ps(d, d));
            }
        }

        let mut sum = unsafe { hsum_ps(acc) };
        for i in chunks * LANES..len {
            let d = a[i] + b[i] - c[i];
            sum += d * d;
        }
        sum
    }
}

/// Horizontal sum of 8 packed f32 values in a __m256 register.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn hsum_ps(v: std::arch::x86_64::__m256) -> f32 {
    use std::arch::x86_64::*;
    let hi = _mm256_extractf128_ps(v, 1);
    let lo = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(lo, hi);
    let shuf = _mm_movehdup_ps(sum128);
    let sum64 = _mm_add_ps(sum128, shuf);
    let high64 = _mm_movehl_ps(shuf, sum64);
    let sum32 = _mm_add_ss(sum64, high64);
    _mm_cvtss_f32(sum32)
}

// Provide a stub for non-x86_64 targets so the module compiles.
#[cfg(not(target_arch = "x86_64"))]
impl ScoreKernel for Avx2Kernel {
    fn isa_level(&self) -> IsaLevel {
        IsaLevel::Generic
    }
    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        super::generic::GenericKernel.dot(a, b)
    }
    fn triple_dot(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        super::generic::GenericKernel.triple_dot(a, b, c)
    }
    fn translation_sq_dist(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        super::generic::GenericKernel.translation_sq_dist(a, b, c)
    }
}
