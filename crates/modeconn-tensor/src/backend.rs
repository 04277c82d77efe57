//! CPU Backend - Host Memory Kernels
//!
//! Slice-level f32 kernels behind the tensor operations. Element-wise
//! kernels switch to rayon data parallelism above a size threshold;
//! matrix multiplication goes through the matrixmultiply crate's GEMM.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rayon::prelude::*;

/// Threshold for using parallel processing (in elements)
const PARALLEL_THRESHOLD: usize = 4096;

// =============================================================================
// CPU Backend Struct
// =============================================================================

/// CPU backend for tensor operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

// =============================================================================
// Element-wise Operations
// =============================================================================

impl CpuBackend {
    /// Fills a slice with a value.
    pub fn fill(dst: &mut [f32], value: f32) {
        for v in dst.iter_mut() {
            *v = value;
        }
    }

    /// Adds two slices element-wise with optional parallelization.
    pub fn add(dst: &mut [f32], a: &[f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(d, (a_val, b_val))| {
                    *d = *a_val + *b_val;
                });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] + b[i];
            }
        }
    }

    /// Subtracts two slices element-wise with optional parallelization.
    pub fn sub(dst: &mut [f32], a: &[f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(d, (a_val, b_val))| {
                    *d = *a_val - *b_val;
                });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] - b[i];
            }
        }
    }

    /// Multiplies two slices element-wise with optional parallelization.
    pub fn mul(dst: &mut [f32], a: &[f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(d, (a_val, b_val))| {
                    *d = *a_val * *b_val;
                });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] * b[i];
            }
        }
    }

    /// Divides two slices element-wise with optional parallelization.
    pub fn div(dst: &mut [f32], a: &[f32], b: &[f32]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut()
                .zip(a.par_iter().zip(b.par_iter()))
                .for_each(|(d, (a_val, b_val))| {
                    *d = *a_val / *b_val;
                });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] / b[i];
            }
        }
    }

    /// Adds a scalar to each element with optional parallelization.
    pub fn add_scalar(dst: &mut [f32], a: &[f32], scalar: f32) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = *a_val + scalar;
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] + scalar;
            }
        }
    }

    /// Multiplies each element by a scalar with optional parallelization.
    pub fn mul_scalar(dst: &mut [f32], a: &[f32], scalar: f32) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = *a_val * scalar;
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i] * scalar;
            }
        }
    }

    /// Negates each element with optional parallelization.
    pub fn neg(dst: &mut [f32], a: &[f32]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = -*a_val;
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = -a[i];
            }
        }
    }

    /// Applies ReLU (max with zero) to each element.
    pub fn relu(dst: &mut [f32], a: &[f32]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = a_val.max(0.0);
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].max(0.0);
            }
        }
    }

    /// Applies square root to each element.
    pub fn sqrt(dst: &mut [f32], a: &[f32]) {
        debug_assert_eq!(a.len(), dst.len());

        for i in 0..dst.len() {
            dst[i] = a[i].sqrt();
        }
    }

    /// Applies the logistic sigmoid to each element.
    pub fn sigmoid(dst: &mut [f32], a: &[f32]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = 1.0 / (1.0 + (-a_val).exp());
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = 1.0 / (1.0 + (-a[i]).exp());
            }
        }
    }

    /// Applies the hyperbolic tangent to each element.
    pub fn tanh(dst: &mut [f32], a: &[f32]) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = a_val.tanh();
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].tanh();
            }
        }
    }

    /// Raises each element to a power.
    pub fn pow(dst: &mut [f32], a: &[f32], exponent: f32) {
        debug_assert_eq!(a.len(), dst.len());

        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_iter_mut().zip(a.par_iter()).for_each(|(d, a_val)| {
                *d = a_val.powf(exponent);
            });
        } else {
            for i in 0..dst.len() {
                dst[i] = a[i].powf(exponent);
            }
        }
    }
}

// =============================================================================
// Reduction Operations
// =============================================================================

impl CpuBackend {
    /// Sums all elements of a slice.
    #[must_use]
    pub fn sum(a: &[f32]) -> f32 {
        if a.len() >= PARALLEL_THRESHOLD {
            a.par_iter().sum()
        } else {
            a.iter().sum()
        }
    }

    /// Returns the maximum element, or None for an empty slice.
    #[must_use]
    pub fn max(a: &[f32]) -> Option<f32> {
        a.iter().copied().reduce(f32::max)
    }

    /// Returns the minimum element, or None for an empty slice.
    #[must_use]
    pub fn min(a: &[f32]) -> Option<f32> {
        a.iter().copied().reduce(f32::min)
    }

    /// Returns the index of the maximum element, or None for an empty slice.
    #[must_use]
    pub fn argmax(a: &[f32]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &v) in a.iter().enumerate() {
            match best {
                Some((_, bv)) if v <= bv => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }
}

// =============================================================================
// Linear Algebra
// =============================================================================

impl CpuBackend {
    /// Performs optimized f32 matrix multiplication using matrixmultiply.
    ///
    /// C = alpha * A @ B + beta * C, all matrices row-major.
    pub fn sgemm(
        c: &mut [f32],
        a: &[f32],
        b: &[f32],
        m: usize,
        n: usize,
        k: usize,
        alpha: f32,
        beta: f32,
    ) {
        debug_assert_eq!(a.len(), m * k);
        debug_assert_eq!(b.len(), k * n);
        debug_assert_eq!(c.len(), m * n);

        unsafe {
            matrixmultiply::sgemm(
                m,
                k,
                n,
                alpha,
                a.as_ptr(),
                k as isize,
                1, // A: row-major (m x k)
                b.as_ptr(),
                n as isize,
                1, // B: row-major (k x n)
                beta,
                c.as_mut_ptr(),
                n as isize,
                1, // C: row-major (m x n)
            );
        }
    }

    /// Performs f32 matrix multiplication: C = A @ B.
    pub fn matmul(c: &mut [f32], a: &[f32], b: &[f32], m: usize, n: usize, k: usize) {
        Self::sgemm(c, a, b, m, n, k, 1.0, 0.0);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        let mut dst = vec![0.0; 3];

        CpuBackend::add(&mut dst, &a, &b);
        assert_eq!(dst, vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_mul_scalar() {
        let a = vec![1.0, 2.0, 3.0];
        let mut dst = vec![0.0; 3];

        CpuBackend::mul_scalar(&mut dst, &a, 2.0);
        assert_eq!(dst, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_relu() {
        let a = vec![-1.0, 0.0, 2.0];
        let mut dst = vec![0.0; 3];

        CpuBackend::relu(&mut dst, &a);
        assert_eq!(dst, vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_reductions() {
        let a = vec![3.0, -1.0, 2.0];
        assert_eq!(CpuBackend::sum(&a), 4.0);
        assert_eq!(CpuBackend::max(&a), Some(3.0));
        assert_eq!(CpuBackend::min(&a), Some(-1.0));
        assert_eq!(CpuBackend::argmax(&a), Some(0));
        assert_eq!(CpuBackend::argmax(&[]), None);
    }

    #[test]
    fn test_matmul_identity() {
        // 2x2 identity times arbitrary 2x2
        let a = vec![1.0, 0.0, 0.0, 1.0];
        let b = vec![5.0, 6.0, 7.0, 8.0];
        let mut c = vec![0.0; 4];

        CpuBackend::matmul(&mut c, &a, &b, 2, 2, 2);
        assert_eq!(c, b);
    }

    #[test]
    fn test_matmul_rectangular() {
        // (1x3) @ (3x2) = (1x2)
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        let mut c = vec![0.0; 2];

        CpuBackend::matmul(&mut c, &a, &b, 1, 2, 3);
        assert_eq!(c, vec![14.0, 32.0]);
    }

    #[test]
    fn test_parallel_path() {
        // Large enough to cross the parallel threshold
        let n = PARALLEL_THRESHOLD + 17;
        let a = vec![1.5; n];
        let b = vec![0.5; n];
        let mut dst = vec![0.0; n];

        CpuBackend::add(&mut dst, &a, &b);
        assert!(dst.iter().all(|&v| (v - 2.0).abs() < 1e-6));
        assert_eq!(CpuBackend::sum(&dst), 2.0 * n as f32);
    }
}
