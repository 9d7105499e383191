//! Pure-Rust scalar fallback for scoring kernels.
//!
//! This implementation works on all platforms and serves as the reference
//! implementation for correctness testing.

use super::{IsaLevel, ScoreKernel};

/// Pure-Rust scalar kernel, no SIMD intrinsics.
#[derive(Debug, Clone, Copy)]
pub struct GenericKernel;

impl ScoreKernel for GenericKernel {
    fn isa_level(&self) -> IsaLevel {
        IsaLevel::Generic
    }

    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");
        a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
    }

    fn triple_dot(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");
        assert_eq!(a.len(), c.len(), "kernel operand lengths differ");
        a.iter()
            .zip(b.iter())
            .zip(c.iter())
            .map(|((&x, &y), &z)| x * y * z)
            .sum()
    }

    fn translation_sq_dist(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "kernel operand lengths differ");
        assert_eq!(a.len(), c.len(), "kernel operand lengths differ");
        a.iter()
            .zip(b.iter())
            .zip(c.iter())
            .map(|((&x, &y), &z)| {
                let d = x + y - z;
                d * d
            })
            .sum()
    }
}
