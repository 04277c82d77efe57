//! Linear Algebra Gradient Functions
//!
//! Gradient functions for linear algebra operations: matmul, transpose, reshape.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::any::Any;

use modeconn_tensor::Tensor;

use crate::grad_fn::{GradFn, GradientFunction};

// =============================================================================
// MatMul Backward
// =============================================================================

/// Gradient function for matrix multiplication.
///
/// For C = A @ B:
/// dL/dA = dL/dC @ B^T
/// dL/dB = A^T @ dL/dC
#[derive(Debug)]
pub struct MatMulBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_lhs: Tensor,
    saved_rhs: Tensor,
}

impl MatMulBackward {
    /// Creates a new `MatMulBackward`.
    #[must_use] pub fn new(
        lhs_grad_fn: Option<GradFn>,
        rhs_grad_fn: Option<GradFn>,
        lhs: Tensor,
        rhs: Tensor,
    ) -> Self {
        Self {
            next_fns: vec![lhs_grad_fn, rhs_grad_fn],
            saved_lhs: lhs,
            saved_rhs: rhs,
        }
    }
}

impl GradientFunction for MatMulBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        // grad_lhs = grad_output @ rhs^T
        let rhs_t = self.saved_rhs.t().unwrap();
        let grad_lhs = grad_output.matmul(&rhs_t).unwrap();

        // grad_rhs = lhs^T @ grad_output
        let lhs_t = self.saved_lhs.t().unwrap();
        let grad_rhs = lhs_t.matmul(grad_output).unwrap();

        vec![Some(grad_lhs), Some(grad_rhs)]
    }

    fn name(&self) -> &'static str {
        "MatMulBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Transpose Backward
// =============================================================================

/// Gradient function for transpose.
///
/// d/dx(x^T) = (`grad_output)^T`
#[derive(Debug)]
pub struct TransposeBackward {
    next_fns: Vec<Option<GradFn>>,
    dim0: usize,
    dim1: usize,
}

impl TransposeBackward {
    /// Creates a new `TransposeBackward`.
    #[must_use] pub fn new(input_grad_fn: Option<GradFn>, dim0: usize, dim1: usize) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            dim0,
            dim1,
        }
    }
}

impl GradientFunction for TransposeBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        // Transpose the gradient back
        let grad = grad_output
            .transpose(self.dim0 as i64, self.dim1 as i64)
            .unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "TransposeBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Reshape Backward
// =============================================================================

/// Gradient function for reshape.
///
/// d/dx(reshape(x)) = `reshape(grad_output`, `original_shape`)
#[derive(Debug)]
pub struct ReshapeBackward {
    next_fns: Vec<Option<GradFn>>,
    original_shape: Vec<usize>,
}

impl ReshapeBackward {
    /// Creates a new `ReshapeBackward`.
    #[must_use] pub fn new(input_grad_fn: Option<GradFn>, original_shape: Vec<usize>) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            original_shape,
        }
    }
}

impl GradientFunction for ReshapeBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        let shape_isize: Vec<isize> = self.original_shape.iter().map(|&x| x as isize).collect();
        let grad = grad_output.reshape(&shape_isize).unwrap();
        vec![Some(grad)]
    }

    fn name(&self) -> &'static str {
        "ReshapeBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
