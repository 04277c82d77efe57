//! Activation Gradient Functions
//!
//! Gradient functions for activation operations: relu, sigmoid, tanh.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::any::Any;

use modeconn_tensor::Tensor;

use crate::grad_fn::{GradFn, GradientFunction};

// =============================================================================
// ReLU Backward
// =============================================================================

/// Gradient function for `ReLU`.
///
/// d/dx(relu(x)) = 1 if x > 0 else 0
#[derive(Debug)]
pub struct ReluBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_input: Tensor,
}

impl ReluBackward {
    /// Creates a new `ReluBackward`.
    #[must_use] pub fn new(input_grad_fn: Option<GradFn>, input: Tensor) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_input: input,
        }
    }
}

impl GradientFunction for ReluBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        let input_data = self.saved_input.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = input_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&x, &g)| if x > 0.0 { g } else { 0.0 })
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_input.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "ReluBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Sigmoid Backward
// =============================================================================

/// Gradient function for sigmoid.
///
/// d/dx(sigmoid(x)) = sigmoid(x) * (1 - sigmoid(x))
#[derive(Debug)]
pub struct SigmoidBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_output: Tensor,
}

impl SigmoidBackward {
    /// Creates a new `SigmoidBackward`.
    #[must_use] pub fn new(input_grad_fn: Option<GradFn>, output: Tensor) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_output: output,
        }
    }
}

impl GradientFunction for SigmoidBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        let output_data = self.saved_output.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = output_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&y, &g)| g * y * (1.0 - y))
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_output.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "SigmoidBackward"
    }

    fn next_functions(&self) -> &[Option<GradFn>] {
        &self.next_fns
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tanh Backward
// =============================================================================

/// Gradient function for tanh.
///
/// d/dx(tanh(x)) = 1 - tanh(x)^2
#[derive(Debug)]
pub struct TanhBackward {
    next_fns: Vec<Option<GradFn>>,
    saved_output: Tensor,
}

impl TanhBackward {
    /// Creates a new `TanhBackward`.
    #[must_use] pub fn new(input_grad_fn: Option<GradFn>, output: Tensor) -> Self {
        Self {
            next_fns: vec![input_grad_fn],
            saved_output: output,
        }
    }
}

impl GradientFunction for TanhBackward {
    fn apply(&self, grad_output: &Tensor) -> Vec<Option<Tensor>> {
        let output_data = self.saved_output.to_vec();
        let grad_data = grad_output.to_vec();

        let result: Vec<f32> = output_data
            .iter()
            .zip(grad_data.iter())
            .map(|(&y, &g)| g * (1.0 - y * y))
            .collect();

        vec![Some(
            Tensor::from_vec(result, self.saved_output.shape()).unwrap(),
        )]
    }

    fn name(&self) -> &'static str {
        "TanhBackward"
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
