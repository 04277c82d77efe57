//! Normalization Layers - BatchNorm and InstanceNorm
//!
//! Normalizes inputs to improve training stability and speed.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use modeconn_autograd::Variable;
use modeconn_tensor::Tensor;

use crate::functional;
use crate::init::{ones, zeros};
use crate::module::Module;
use crate::parameter::{Buffer, Parameter};

// =============================================================================
// BatchNorm2d
// =============================================================================

/// Applies Batch Normalization over a 4D input (images).
///
/// y = (x - E[x]) / sqrt(Var[x] + eps) * gamma + beta
///
/// Batch statistics are used during training and folded into the running
/// statistics buffers; the running statistics are used at evaluation.
///
/// # Shape
/// - Input: (N, C, H, W)
/// - Output: Same as input
pub struct BatchNorm2d {
    /// Learnable scale parameter (gamma).
    pub weight: Parameter,
    /// Learnable shift parameter (beta).
    pub bias: Parameter,
    /// Running mean for inference (updated during training).
    running_mean: Buffer,
    /// Running variance for inference (updated during training).
    running_var: Buffer,
    /// Number of features (channels).
    num_features: usize,
    /// Epsilon for numerical stability.
    eps: f32,
    /// Momentum for running stats update: running = (1 - momentum) * running + momentum * batch.
    momentum: f32,
    /// Whether in training mode.
    training: AtomicBool,
}

impl BatchNorm2d {
    /// Creates a new BatchNorm2d layer.
    pub fn new(num_features: usize) -> Self {
        Self::with_options(num_features, 1e-5, 0.1)
    }

    /// Creates a BatchNorm2d with custom options.
    pub fn with_options(num_features: usize, eps: f32, momentum: f32) -> Self {
        Self {
            weight: Parameter::named("weight", ones(&[num_features]), true),
            bias: Parameter::named("bias", zeros(&[num_features]), true),
            running_mean: Buffer::named("running_mean", zeros(&[num_features])),
            running_var: Buffer::named("running_var", ones(&[num_features])),
            num_features,
            eps,
            momentum,
            training: AtomicBool::new(true),
        }
    }

    /// Returns the number of features (channels).
    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

impl Module for BatchNorm2d {
    fn forward(&self, input: &Variable) -> Variable {
        let channels = input.shape()[1];
        assert_eq!(
            channels, self.num_features,
            "BatchNorm2d: expected {} channels, got {}",
            self.num_features, channels
        );

        functional::batch_norm(
            input,
            &self.running_mean,
            &self.running_var,
            &self.weight.data(),
            &self.bias.data(),
            self.training.load(Ordering::Relaxed),
            self.momentum,
            self.eps,
        )
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![self.weight.clone(), self.bias.clone()]
    }

    fn named_parameters(&self) -> HashMap<String, Parameter> {
        let mut params = HashMap::new();
        params.insert("weight".to_string(), self.weight.clone());
        params.insert("bias".to_string(), self.bias.clone());
        params
    }

    fn buffers(&self) -> Vec<Buffer> {
        vec![self.running_mean.clone(), self.running_var.clone()]
    }

    fn set_training(&mut self, training: bool) {
        self.training.store(training, Ordering::Relaxed);
    }

    fn is_training(&self) -> bool {
        self.training.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "BatchNorm2d"
    }
}

// =============================================================================
// InstanceNorm1d
// =============================================================================

/// Applies Instance Normalization over a 3D input.
///
/// Each (sample, channel) row is normalized over the last dimension
/// independently. No affine parameters, no running statistics, so the layer
/// behaves identically in training and evaluation mode.
///
/// # Shape
/// - Input: (N, C, L)
/// - Output: Same as input
pub struct InstanceNorm1d {
    /// Number of features. Metadata only: with no affine parameters the
    /// normalization itself never consults it.
    num_features: usize,
    /// Epsilon for numerical stability.
    eps: f32,
}

impl InstanceNorm1d {
    /// Creates a new InstanceNorm1d layer.
    pub fn new(num_features: usize) -> Self {
        Self::with_eps(num_features, 1e-5)
    }

    /// Creates an InstanceNorm1d with custom epsilon.
    pub fn with_eps(num_features: usize, eps: f32) -> Self {
        Self { num_features, eps }
    }

    /// Returns the number of features.
    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

impl Module for InstanceNorm1d {
    fn forward(&self, input: &Variable) -> Variable {
        let input_data = input.data();
        let shape = input_data.shape().to_vec();
        assert_eq!(
            shape.len(),
            3,
            "InstanceNorm1d: expected (N, C, L) input, got {:?}",
            shape
        );
        let batch_size = shape[0];
        let channels = shape[1];
        let length = shape[2];

        let input_vec = input_data.to_vec();
        let mut output_vec = vec![0.0f32; input_vec.len()];

        for b in 0..batch_size {
            for c in 0..channels {
                let start = b * channels * length + c * length;
                let slice = &input_vec[start..start + length];

                let mean: f32 = slice.iter().sum::<f32>() / length as f32;
                let var: f32 =
                    slice.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / length as f32;

                for i in 0..length {
                    output_vec[start + i] = (slice[i] - mean) / (var + self.eps).sqrt();
                }
            }
        }

        let output = Tensor::from_vec(output_vec, &shape).unwrap();
        Variable::new(output, input.requires_grad())
    }

    fn name(&self) -> &'static str {
        "InstanceNorm1d"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batchnorm2d_shape() {
        let bn = BatchNorm2d::new(2);
        let input = Variable::new(
            Tensor::from_vec(vec![1.0; 32], &[2, 2, 2, 4]).unwrap(),
            false,
        );
        let output = bn.forward(&input);
        assert_eq!(output.shape(), vec![2, 2, 2, 4]);
    }

    #[test]
    fn test_batchnorm2d_parameters_and_buffers() {
        let bn = BatchNorm2d::new(10);
        assert_eq!(bn.parameters().len(), 2);
        assert_eq!(bn.num_parameters(), 20); // weight + bias
        assert_eq!(bn.buffers().len(), 2);
        assert_eq!(bn.buffers()[0].shape(), vec![10]);
    }

    #[test]
    fn test_batchnorm2d_updates_running_stats_in_training() {
        let bn = BatchNorm2d::new(1);
        let input = Variable::new(
            Tensor::from_vec(vec![10.0; 4], &[1, 1, 2, 2]).unwrap(),
            false,
        );
        bn.forward(&input);
        // Batch mean 10, batch variance 0, momentum 0.1
        let mean = bn.buffers()[0].data().to_vec()[0];
        let var = bn.buffers()[1].data().to_vec()[0];
        assert!((mean - 1.0).abs() < 1e-6);
        assert!((var - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_batchnorm2d_eval_keeps_running_stats() {
        let mut bn = BatchNorm2d::new(1);
        bn.eval();
        let input = Variable::new(
            Tensor::from_vec(vec![10.0; 4], &[1, 1, 2, 2]).unwrap(),
            false,
        );
        bn.forward(&input);
        assert_eq!(bn.buffers()[0].data().to_vec(), vec![0.0]);
        assert_eq!(bn.buffers()[1].data().to_vec(), vec![1.0]);
    }

    #[test]
    fn test_instance_norm_normalizes_rows() {
        let norm = InstanceNorm1d::new(4);
        let input = Variable::new(
            Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 1, 4]).unwrap(),
            false,
        );
        let output = norm.forward(&input);
        let out = output.data().to_vec();

        let mean: f32 = out.iter().sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-5);
        assert!((out[0] + 1.3416).abs() < 1e-3);
        assert!((out[3] - 1.3416).abs() < 1e-3);
    }

    #[test]
    fn test_instance_norm_per_sample() {
        let norm = InstanceNorm1d::new(2);
        let input = Variable::new(
            Tensor::from_vec(vec![1.0, 3.0, 100.0, 300.0], &[2, 1, 2]).unwrap(),
            false,
        );
        let output = norm.forward(&input);
        let out = output.data().to_vec();
        // Both samples normalize to the same values despite different scales
        assert!((out[0] - out[2]).abs() < 1e-4);
        assert!((out[1] - out[3]).abs() < 1e-4);
    }
}
