//! CurveBatchNorm2d - Batch Normalization on a Weight-Space Curve
//!
//! The affine scale and shift exist once per bend and are blended like any
//! other curve weights. The running statistics are shared across bends:
//! the curve is evaluated at one position per forward pass, and all
//! positions describe the same underlying network.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::atomic::{AtomicBool, Ordering};

use modeconn_autograd::Variable;
use modeconn_nn::{functional, Buffer, Parameter};
use modeconn_tensor::{ones, zeros, Tensor};
use parking_lot::RwLock;

use crate::params::{squared_norm, BendParameters};

// =============================================================================
// CurveBatchNorm2d
// =============================================================================

/// Batch normalization over a 4D input, with per-bend affine parameters.
///
/// y = (x - E[x]) / sqrt(Var[x] + eps) * gamma_t + beta_t
///
/// where gamma_t and beta_t are blended from the per-bend copies. Batch
/// statistics are folded into the shared running statistics during training;
/// the running statistics are used at evaluation.
///
/// # Shape
/// - Input: (N, C, H, W)
/// - Output: Same as input
pub struct CurveBatchNorm2d {
    /// Scale copies (gamma) of shape (num_features), one per bend.
    pub weight: BendParameters,
    /// Shift copies (beta) of shape (num_features), one per bend.
    pub bias: BendParameters,
    /// Running mean, shared by all bends.
    running_mean: Buffer,
    /// Running variance, shared by all bends.
    running_var: Buffer,
    /// Number of features (channels).
    num_features: usize,
    /// Epsilon for numerical stability.
    eps: f32,
    /// Momentum for running stats update: running = (1 - momentum) * running + momentum * batch.
    momentum: f32,
    /// Whether in training mode.
    training: AtomicBool,
    /// Squared norm of the blended affine parameters from the latest forward pass.
    l2: RwLock<f32>,
}

impl CurveBatchNorm2d {
    /// Creates a new curve batch normalization layer.
    pub fn new(num_features: usize, fixed: &[bool]) -> Self {
        Self::with_options(num_features, fixed, 1e-5, 0.1)
    }

    /// Creates a curve batch normalization layer with custom options.
    pub fn with_options(num_features: usize, fixed: &[bool], eps: f32, momentum: f32) -> Self {
        let layer = Self {
            weight: BendParameters::new("weight", &[num_features], fixed),
            bias: BendParameters::new("bias", &[num_features], fixed),
            running_mean: Buffer::named("running_mean", zeros(&[num_features])),
            running_var: Buffer::named("running_var", ones(&[num_features])),
            num_features,
            eps,
            momentum,
            training: AtomicBool::new(true),
            l2: RwLock::new(0.0),
        };
        layer.reset_parameters();
        layer
    }

    /// Resets every scale bend to ones and every shift bend to zeros, and
    /// the running statistics to zero mean and unit variance.
    fn reset_parameters(&self) {
        self.weight.reset_with(|| ones(&[self.num_features]));
        self.bias.reset_with(|| zeros(&[self.num_features]));
        self.running_mean.set_data(zeros(&[self.num_features]));
        self.running_var.set_data(ones(&[self.num_features]));
    }

    /// Forward pass at the curve position described by `coeffs`.
    ///
    /// Updates the layer's `l2` value with the squared norm of the blended
    /// scale and shift.
    pub fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable {
        let channels = input.shape()[1];
        assert_eq!(
            channels, self.num_features,
            "CurveBatchNorm2d: expected {} channels, got {}",
            self.num_features, channels
        );

        let weight_t = self.weight.blend(coeffs);
        let bias_t = self.bias.blend(coeffs);
        *self.l2.write() = squared_norm(&weight_t) + squared_norm(&bias_t);

        functional::batch_norm(
            input,
            &self.running_mean,
            &self.running_var,
            &weight_t,
            &bias_t,
            self.training.load(Ordering::Relaxed),
            self.momentum,
            self.eps,
        )
    }

    /// Squared norm of the blended parameters from the latest forward pass.
    pub fn l2(&self) -> f32 {
        *self.l2.read()
    }

    /// Number of bends.
    pub fn num_bends(&self) -> usize {
        self.weight.num_bends()
    }

    /// All bend parameters: scale bends in order, then shift bends.
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut params = self.weight.parameters();
        params.extend(self.bias.parameters());
        params
    }

    /// The parameters of a single bend, in the order of the plain layer.
    pub fn bend_parameters(&self, index: usize) -> Vec<Parameter> {
        vec![self.weight.bend(index).clone(), self.bias.bend(index).clone()]
    }

    /// The blended parameter tensors at the given coefficients.
    pub fn blended_parameters(&self, coeffs: &[f32]) -> Vec<Tensor> {
        vec![self.weight.blend(coeffs), self.bias.blend(coeffs)]
    }

    /// The shared running statistics, mean then variance.
    pub fn buffers(&self) -> Vec<Buffer> {
        vec![self.running_mean.clone(), self.running_var.clone()]
    }

    /// Sets the training mode.
    pub fn set_training(&mut self, training: bool) {
        self.training.store(training, Ordering::Relaxed);
    }

    /// Returns whether the layer is in training mode.
    pub fn is_training(&self) -> bool {
        self.training.load(Ordering::Relaxed)
    }

    /// Returns the number of features (channels).
    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

impl std::fmt::Debug for CurveBatchNorm2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveBatchNorm2d")
            .field("num_features", &self.num_features)
            .field("num_bends", &self.num_bends())
            .field("eps", &self.eps)
            .field("momentum", &self.momentum)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_tensor::full;

    #[test]
    fn test_creation() {
        let bn = CurveBatchNorm2d::new(8, &[true, false, true]);
        assert_eq!(bn.num_bends(), 3);
        assert_eq!(bn.parameters().len(), 6);
        assert_eq!(bn.buffers().len(), 2);
        assert_eq!(bn.weight.bend(0).data().to_vec(), vec![1.0; 8]);
        assert_eq!(bn.bias.bend(0).data().to_vec(), vec![0.0; 8]);
        assert!(!bn.weight.bend(0).requires_grad());
        assert!(bn.weight.bend(1).requires_grad());
    }

    #[test]
    fn test_eval_applies_blended_affine() {
        let mut bn = CurveBatchNorm2d::new(1, &[false, false]);
        bn.set_training(false);
        bn.weight.bend(0).update_data(full(&[1], 2.0));
        bn.bias.bend(0).update_data(full(&[1], 1.0));

        // Running stats stay at zero mean, unit variance
        let input = Variable::new(full(&[1, 1, 1, 1], 3.0), false);
        let output = bn.forward_t(&input, &[1.0, 0.0]);
        // y = (3 - 0) / sqrt(1 + eps) * 2 + 1
        assert!((output.data().to_vec()[0] - 7.0).abs() < 1e-3);
    }

    #[test]
    fn test_training_updates_shared_stats() {
        let bn = CurveBatchNorm2d::new(1, &[false, false]);
        let input = Variable::new(full(&[1, 1, 2, 2], 10.0), false);
        bn.forward_t(&input, &[0.5, 0.5]);

        // Batch mean 10, batch variance 0, momentum 0.1
        let mean = bn.buffers()[0].data().to_vec()[0];
        let var = bn.buffers()[1].data().to_vec()[0];
        assert!((mean - 1.0).abs() < 1e-6);
        assert!((var - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_l2_counts_scale_and_shift() {
        let bn = CurveBatchNorm2d::new(4, &[false, false]);
        let input = Variable::new(full(&[1, 4, 2, 2], 1.0), false);
        bn.forward_t(&input, &[1.0, 0.0]);
        // Scale bends are ones, shift bends zeros: l2 = 4
        assert!((bn.l2() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_blended_parameters_order() {
        let bn = CurveBatchNorm2d::new(2, &[false, false]);
        let tensors = bn.blended_parameters(&[1.0, 0.0]);
        assert_eq!(tensors.len(), 2);
        assert_eq!(tensors[0].to_vec(), vec![1.0, 1.0]);
        assert_eq!(tensors[1].to_vec(), vec![0.0, 0.0]);
    }
}
