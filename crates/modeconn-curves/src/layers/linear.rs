//! CurveLinear - Fully Connected Layer on a Weight-Space Curve
//!
//! Applies y = xW^T + b where W and b are blended from per-bend copies
//! using the curve coefficients for the requested position.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_autograd::Variable;
use modeconn_nn::{functional, Parameter};
use modeconn_tensor::{uniform, Tensor};
use parking_lot::RwLock;

use crate::params::{squared_norm, BendParameters};

// =============================================================================
// CurveLinear
// =============================================================================

/// Fully connected layer with one weight and bias copy per bend.
///
/// `forward_t` blends the copies with the given coefficients and applies the
/// ordinary linear transformation. The blend is recorded in the autograd
/// graph, so gradients reach every non-fixed bend.
///
/// # Shape
/// - Input: (N, in_features) or (*, in_features)
/// - Output: (N, out_features) or (*, out_features)
pub struct CurveLinear {
    /// Weight copies of shape (out_features, in_features), one per bend.
    pub weight: BendParameters,
    /// Optional bias copies of shape (out_features), one per bend.
    pub bias: Option<BendParameters>,
    /// Number of input features.
    in_features: usize,
    /// Number of output features.
    out_features: usize,
    /// Squared norm of the blended weights from the latest forward pass.
    l2: RwLock<f32>,
}

impl CurveLinear {
    /// Creates a new curve linear layer with bias.
    pub fn new(in_features: usize, out_features: usize, fixed: &[bool]) -> Self {
        Self::with_bias(in_features, out_features, true, fixed)
    }

    /// Creates a curve linear layer, optionally with bias.
    pub fn with_bias(
        in_features: usize,
        out_features: usize,
        bias: bool,
        fixed: &[bool],
    ) -> Self {
        let layer = Self {
            weight: BendParameters::new("weight", &[out_features, in_features], fixed),
            bias: if bias {
                Some(BendParameters::new("bias", &[out_features], fixed))
            } else {
                None
            },
            in_features,
            out_features,
            l2: RwLock::new(0.0),
        };
        layer.reset_parameters();
        layer
    }

    /// Draws every bend from U(-stdv, stdv) with stdv = 1 / sqrt(in_features).
    ///
    /// Weight and bias bends use the same range.
    fn reset_parameters(&self) {
        let stdv = 1.0 / (self.in_features as f32).sqrt();
        self.weight
            .reset_with(|| uniform(&[self.out_features, self.in_features], -stdv, stdv));
        if let Some(ref bias) = self.bias {
            bias.reset_with(|| uniform(&[self.out_features], -stdv, stdv));
        }
    }

    /// Forward pass at the curve position described by `coeffs`.
    ///
    /// Updates the layer's `l2` value with the squared norm of the blended
    /// weight and bias.
    pub fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable {
        let weight_t = self.weight.blend_var(coeffs);
        let bias_t = self.bias.as_ref().map(|b| b.blend_var(coeffs));

        let mut l2 = squared_norm(&weight_t.data());
        if let Some(ref b) = bias_t {
            l2 += squared_norm(&b.data());
        }
        *self.l2.write() = l2;

        functional::linear(input, &weight_t, bias_t.as_ref())
    }

    /// Squared norm of the blended parameters from the latest forward pass.
    pub fn l2(&self) -> f32 {
        *self.l2.read()
    }

    /// Number of bends.
    pub fn num_bends(&self) -> usize {
        self.weight.num_bends()
    }

    /// All bend parameters: weight bends in order, then bias bends.
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut params = self.weight.parameters();
        if let Some(ref bias) = self.bias {
            params.extend(bias.parameters());
        }
        params
    }

    /// The parameters of a single bend, in the order of the plain layer.
    pub fn bend_parameters(&self, index: usize) -> Vec<Parameter> {
        let mut params = vec![self.weight.bend(index).clone()];
        if let Some(ref bias) = self.bias {
            params.push(bias.bend(index).clone());
        }
        params
    }

    /// The blended parameter tensors at the given coefficients.
    pub fn blended_parameters(&self, coeffs: &[f32]) -> Vec<Tensor> {
        let mut tensors = vec![self.weight.blend(coeffs)];
        if let Some(ref bias) = self.bias {
            tensors.push(bias.blend(coeffs));
        }
        tensors
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

impl std::fmt::Debug for CurveLinear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveLinear")
            .field("in_features", &self.in_features)
            .field("out_features", &self.out_features)
            .field("num_bends", &self.num_bends())
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

    fn set_bend(group: &BendParameters, index: usize, data: Vec<f32>, shape: &[usize]) {
        group
            .bend(index)
            .update_data(Tensor::from_vec(data, shape).unwrap());
    }

    #[test]
    fn test_creation() {
        let layer = CurveLinear::new(4, 3, &[true, false, true]);
        assert_eq!(layer.num_bends(), 3);
        assert_eq!(layer.weight.shape(), vec![3, 4]);
        assert_eq!(layer.parameters().len(), 6);
        assert_eq!(layer.bend_parameters(1).len(), 2);
        assert!(!layer.weight.bend(0).requires_grad());
        assert!(layer.weight.bend(1).requires_grad());
    }

    #[test]
    fn test_endpoint_coefficients_select_one_bend() {
        let layer = CurveLinear::new(2, 2, &[false, false]);
        set_bend(&layer.weight, 0, vec![1.0, 0.0, 0.0, 1.0], &[2, 2]);
        set_bend(&layer.weight, 1, vec![2.0, 0.0, 0.0, 2.0], &[2, 2]);
        set_bend(layer.bias.as_ref().unwrap(), 0, vec![1.0, 1.0], &[2]);
        set_bend(layer.bias.as_ref().unwrap(), 1, vec![0.0, 0.0], &[2]);

        let input = Variable::new(Tensor::from_vec(vec![3.0, 4.0], &[1, 2]).unwrap(), false);

        let at_start = layer.forward_t(&input, &[1.0, 0.0]);
        assert_eq!(at_start.data().to_vec(), vec![4.0, 5.0]);

        let at_end = layer.forward_t(&input, &[0.0, 1.0]);
        assert_eq!(at_end.data().to_vec(), vec![6.0, 8.0]);
    }

    #[test]
    fn test_midpoint_blends_weights() {
        let layer = CurveLinear::with_bias(2, 1, false, &[false, false]);
        set_bend(&layer.weight, 0, vec![0.0, 0.0], &[1, 2]);
        set_bend(&layer.weight, 1, vec![2.0, 2.0], &[1, 2]);

        let input = Variable::new(Tensor::from_vec(vec![1.0, 1.0], &[1, 2]).unwrap(), false);
        let output = layer.forward_t(&input, &[0.5, 0.5]);
        // Blended weight is [1, 1]
        assert_eq!(output.data().to_vec(), vec![2.0]);
    }

    #[test]
    fn test_l2_tracks_blended_norm() {
        let layer = CurveLinear::with_bias(2, 1, false, &[false, false]);
        set_bend(&layer.weight, 0, vec![3.0, 0.0], &[1, 2]);
        set_bend(&layer.weight, 1, vec![0.0, 4.0], &[1, 2]);

        let input = Variable::new(Tensor::from_vec(vec![1.0, 1.0], &[1, 2]).unwrap(), false);
        layer.forward_t(&input, &[1.0, 0.0]);
        assert!((layer.l2() - 9.0).abs() < 1e-6);

        layer.forward_t(&input, &[0.5, 0.5]);
        // Blended weight is [1.5, 2.0]
        assert!((layer.l2() - 6.25).abs() < 1e-6);
    }

    #[test]
    fn test_gradients_respect_fixed_bends() {
        let layer = CurveLinear::new(2, 2, &[true, false, true]);
        let input = Variable::new(Tensor::from_vec(vec![1.0, 2.0], &[1, 2]).unwrap(), false);

        let output = layer.forward_t(&input, &[0.25, 0.5, 0.25]);
        let loss = output.sum();
        loss.backward();

        assert!(layer.weight.bend(0).grad().is_none());
        assert!(layer.weight.bend(1).grad().is_some());
        assert!(layer.weight.bend(2).grad().is_none());
        assert!(layer.bias.as_ref().unwrap().bend(1).grad().is_some());
    }

    #[test]
    fn test_no_bias() {
        let layer = CurveLinear::with_bias(3, 2, false, &[false, false]);
        assert!(layer.bias.is_none());
        assert_eq!(layer.parameters().len(), 2);
        assert_eq!(layer.bend_parameters(0).len(), 1);
        assert_eq!(layer.blended_parameters(&[1.0, 0.0]).len(), 1);
    }
}
