//! Vectorized numeric kernels for embedding scoring.
//!
//! This module provides a `ScoreKernel` trait with CPU-specific implementations.
//! At runtime, [`detect_isa`] determines the best available instruction set and
//! [`best_kernel`] returns the fastest implementation for the current CPU.
//!
//! # Supported ISA levels
//!
//! - **Generic**: Pure-Rust scalar loops, works everywhere
//! - **AVX2**: 256-bit SIMD (8 × f32 lanes) for x86_64 CPUs with AVX2 support

pub mod avx2;
pub mod generic;

/// Instruction set architecture level detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IsaLevel {
    /// Pure-Rust scalar operations, no SIMD.
    Generic,
    /// x86_64 AVX2 (256-bit vectors).
    Avx2,
}

impl std::fmt::Display for IsaLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IsaLevel::Generic => write!(f, "Generic (scalar)"),
            IsaLevel::Avx2 => write!(f, "AVX2 (256-bit)"),
        }
    }
}

/// Detect the best ISA level available on the current CPU.
pub fn detect_isa() -> IsaLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return IsaLevel::Avx2;
        }
    }
    IsaLevel::Generic
}

/// Reductions over `f32` embedding rows.
///
/// All slices passed to one call must have the same length; implementations
/// panic otherwise.
pub trait ScoreKernel: Send + Sync {
    /// The ISA level this kernel targets.
    fn isa_level(&self) -> IsaLevel;

    /// `Σ a[i] * b[i]`
    fn dot(&self, a: &[f32], b: &[f32]) -> f32;

    /// `Σ a[i] * b[i] * c[i]`
    fn triple_dot(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32;

    /// `Σ (a[i] + b[i] - c[i])²`
    fn translation_sq_dist(&self, a: &[f32], b: &[f32], c: &[f32]) -> f32;

    /// Euclidean norm of `a`.
    fn l2_norm(&self, a: &[f32]) -> f32 {
        self.dot(a, a).sqrt()
    }
}

/// Return the best available kernel for the current CPU.
pub fn best_kernel() -> Box<dyn ScoreKernel> {
    match detect_isa() {
        #[cfg(target_arch = "x86_64")]
        IsaLevel::Avx2 => Box::new(avx2::Avx2Kernel),
        _ => Box::new(generic::GenericKernel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_isa_returns_valid_level() {
        let level = detect_isa();
        assert!(level >= IsaLevel::Generic);
    }

    #[test]
    fn best_kernel_returns_working_kernel() {
        let kernel = best_kernel();
        assert!(kernel.isa_level() >= IsaLevel::Generic);
        assert!((kernel.dot(&[1.0, 2.0], &[3.0, 4.0]) - 11.0).abs() < 1e-6);
    }

    /// Run the full kernel test suite against any implementation.
    pub fn kernel_conformance_tests(kernel: &dyn ScoreKernel) {
        // Lengths straddle the 8-lane width so the scalar tail is exercised.
        for len in [0usize, 1, 7, 8, 9, 50, 64] {
            let a: Vec<f32> = (0..len).map(|i| (i as f32 * 0.37).sin()).collect();
            let b: Vec<f32> = (0..len).map(|i| (i as f32 * 0.11).cos()).collect();
            let c: Vec<f32> = (0..len).map(|i| 0.5 - (i % 3) as f32 * 0.25).collect();

            let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
            let triple: f32 = (0..len).map(|i| a[i] * b[i] * c[i]).sum();
            let trans: f32 = (0..len).map(|i| (a[i] + b[i] - c[i]).powi(2)).sum();

            let close = |x: f32, y: f32| (x - y).abs() <= 1e-4 * (1.0 + y.abs());
            assert!(close(kernel.dot(&a, &b), dot), "dot len={len}");
            assert!(close(kernel.triple_dot(&a, &b, &c), triple), "triple_dot len={len}");
            assert!(
                close(kernel.translation_sq_dist(&a, &b, &c), trans),
                "translation len={len}"
            );
        }

        let v = vec![3.0f32, 4.0];
        assert!((kernel.l2_norm(&v) - 5.0).abs() < 1e-6);

        let ones = vec![1.0f32; 128];
        assert!((kernel.triple_dot(&ones, &ones, &ones) - 128.0).abs() < 1e-4);
        assert!((kernel.translation_sq_dist(&ones, &ones, &ones) - 128.0).abs() < 1e-4);
    }

    #[test]
    fn generic_kernel_conformance() {
        kernel_conformance_tests(&generic::GenericKernel);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn avx2_kernel_conformance() {
        if detect_isa() >= IsaLevel::Avx2 {
            kernel_conformance_tests(&avx2::Avx2Kernel);
        }
    }

    #[test]
    #[should_panic(expected = "kernel operand lengths differ")]
    fn generic_dot_rejects_mismatched_lengths() {
        generic::GenericKernel.dot(&[1.0; 64], &[1.0; 1]);
    }

    #[test]
    #[should_panic(expected = "kernel operand lengths differ")]
    fn avx2_dot_rejects_mismatched_lengths() {
        avx2::Avx2Kernel.dot(&[1.0; 64], &[1.0; 1]);
    }

    #[test]
    #[should_panic(expected = "kernel operand lengths differ")]
    fn avx2_triple_dot_rejects_short_third_operand() {
        avx2::Avx2Kernel.triple_dot(&[1.0; 16], &[1.0; 16], &[1.0; 9]);
    }

    #[test]
    #[should_panic(expected = "kernel operand lengths differ")]
    fn avx2_translation_rejects_short_second_operand() {
        avx2::Avx2Kernel.translation_sq_dist(&[1.0; 16], &[1.0; 8], &[1.0; 16]);
    }
}
