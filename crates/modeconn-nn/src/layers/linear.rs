//! Linear Layer - Fully Connected Layer
//!
//! Applies a linear transformation: y = xW^T + b
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use modeconn_autograd::Variable;
use modeconn_tensor::Tensor;

use crate::functional;
use crate::init::{kaiming_uniform, zeros};
use crate::module::Module;
use crate::parameter::Parameter;

// =============================================================================
// Linear Layer
// =============================================================================

/// Fully connected linear layer.
///
/// Applies `y = xW^T + b` where W has shape `[out_features, in_features]`.
///
/// # Shape
/// - Input: (N, in_features) or (*, in_features)
/// - Output: (N, out_features) or (*, out_features)
pub struct Linear {
    /// Weight matrix of shape (out_features, in_features).
    pub weight: Parameter,
    /// Optional bias vector of shape (out_features).
    pub bias: Option<Parameter>,
    /// Number of input features.
    in_features: usize,
    /// Number of output features.
    out_features: usize,
}

impl Linear {
    /// Creates a new linear layer with bias.
    ///
    /// Weights are initialized with Kaiming uniform, bias with zeros.
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self::with_bias(in_features, out_features, true)
    }

    /// Creates a linear layer, optionally with bias.
    pub fn with_bias(in_features: usize, out_features: usize, bias: bool) -> Self {
        let weight_data = kaiming_uniform(out_features, in_features);
        let weight = Parameter::named("weight", weight_data, true);

        let bias_param = if bias {
            Some(Parameter::named("bias", zeros(&[out_features]), true))
        } else {
            None
        };

        Self {
            weight,
            bias: bias_param,
            in_features,
            out_features,
        }
    }

    /// Creates a linear layer from existing weight and bias tensors.
    pub fn from_weights(weight: Tensor, bias: Option<Tensor>) -> Self {
        let shape = weight.shape().to_vec();
        let out_features = shape[0];
        let in_features = shape[1];

        Self {
            weight: Parameter::named("weight", weight, true),
            bias: bias.map(|b| Parameter::named("bias", b, true)),
            in_features,
            out_features,
        }
    }

    /// Returns the number of input features.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the number of output features.
    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Variable) -> Variable {
        let weight = self.weight.variable();
        let bias = self.bias.as_ref().map(Parameter::variable);
        functional::linear(input, &weight, bias.as_ref())
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = vec![self.weight.clone()];
        if let Some(ref bias) = self.bias {
            params.push(bias.clone());
        }
        params
    }

    fn named_parameters(&self) -> HashMap<String, Parameter> {
        let mut params = HashMap::new();
        params.insert("weight".to_string(), self.weight.clone());
        if let Some(ref bias) = self.bias {
            params.insert("bias".to_string(), bias.clone());
        }
        params
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

impl std::fmt::Debug for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linear")
            .field("in_features", &self.in_features)
            .field("out_features", &self.out_features)
            .field("bias", &self.bias.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_creation() {
        let linear = Linear::new(10, 5);
        assert_eq!(linear.in_features(), 10);
        assert_eq!(linear.out_features(), 5);
        assert_eq!(linear.weight.shape(), vec![5, 10]);
        assert!(linear.bias.is_some());
    }

    #[test]
    fn test_linear_no_bias() {
        let linear = Linear::with_bias(10, 5, false);
        assert!(linear.bias.is_none());
        assert_eq!(linear.parameters().len(), 1);
    }

    #[test]
    fn test_linear_forward_shape() {
        let linear = Linear::new(4, 3);
        let input = Variable::new(Tensor::from_vec(vec![1.0; 8], &[2, 4]).unwrap(), false);
        let output = linear.forward(&input);
        assert_eq!(output.shape(), vec![2, 3]);
    }

    #[test]
    fn test_linear_from_weights() {
        let weight = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();
        let linear = Linear::from_weights(weight, None);

        let input = Variable::new(Tensor::from_vec(vec![3.0, 4.0], &[1, 2]).unwrap(), false);
        let output = linear.forward(&input);
        // Identity weight matrix
        assert_eq!(output.data().to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_linear_backward_reaches_parameters() {
        let linear = Linear::new(3, 2);
        let input = Variable::new(Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap(), false);

        let output = linear.forward(&input);
        let loss = output.sum();
        loss.backward();

        assert!(linear.weight.grad().is_some());
        assert!(linear.bias.as_ref().unwrap().grad().is_some());
    }

    #[test]
    fn test_linear_num_parameters() {
        let linear = Linear::new(10, 5);
        // 50 weights + 5 biases
        assert_eq!(linear.num_parameters(), 55);
    }
}
