//! CurveConv2d - 2D Convolution on a Weight-Space Curve
//!
//! Convolution whose kernel and bias are blended from per-bend copies
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
// CurveConv2d
// =============================================================================

/// 2D convolution with one kernel and bias copy per bend.
///
/// # Shape
/// - Input: (N, C_in, H, W)
/// - Output: (N, C_out, H_out, W_out)
///
/// where H_out = (H + 2*padding - kernel_size) / stride + 1
pub struct CurveConv2d {
    /// Kernel copies of shape (out_channels, in_channels, kernel_h, kernel_w).
    pub weight: BendParameters,
    /// Optional bias copies of shape (out_channels), one per bend.
    pub bias: Option<BendParameters>,
    /// Number of input channels.
    in_channels: usize,
    /// Number of output channels.
    out_channels: usize,
    /// Size of the convolving kernel (height, width).
    kernel_size: (usize, usize),
    /// Stride of the convolution (height, width).
    stride: (usize, usize),
    /// Zero-padding added to both sides (height, width).
    padding: (usize, usize),
    /// Squared norm of the blended weights from the latest forward pass.
    l2: RwLock<f32>,
}

impl CurveConv2d {
    /// Creates a new curve convolution with square kernel, unit stride, no padding.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        fixed: &[bool],
    ) -> Self {
        Self::with_options(
            in_channels,
            out_channels,
            (kernel_size, kernel_size),
            (1, 1),
            (0, 0),
            true,
            fixed,
        )
    }

    /// Creates a curve convolution with all options.
    pub fn with_options(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        bias: bool,
        fixed: &[bool],
    ) -> Self {
        let (kh, kw) = kernel_size;
        let layer = Self {
            weight: BendParameters::new("weight", &[out_channels, in_channels, kh, kw], fixed),
            bias: if bias {
                Some(BendParameters::new("bias", &[out_channels], fixed))
            } else {
                None
            },
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            l2: RwLock::new(0.0),
        };
        layer.reset_parameters();
        layer
    }

    /// Draws every bend from U(-stdv, stdv) with
    /// stdv = 1 / sqrt(in_channels * kernel_h * kernel_w).
    fn reset_parameters(&self) {
        let (kh, kw) = self.kernel_size;
        let stdv = 1.0 / ((self.in_channels * kh * kw) as f32).sqrt();
        self.weight.reset_with(|| {
            uniform(
                &[self.out_channels, self.in_channels, kh, kw],
                -stdv,
                stdv,
            )
        });
        if let Some(ref bias) = self.bias {
            bias.reset_with(|| uniform(&[self.out_channels], -stdv, stdv));
        }
    }

    /// Forward pass at the curve position described by `coeffs`.
    ///
    /// Updates the layer's `l2` value with the squared norm of the blended
    /// kernel and bias.
    pub fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable {
        let weight_t = self.weight.blend(coeffs);
        let bias_t = self.bias.as_ref().map(|b| b.blend(coeffs));

        let mut l2 = squared_norm(&weight_t);
        if let Some(ref b) = bias_t {
            l2 += squared_norm(b);
        }
        *self.l2.write() = l2;

        functional::conv2d(input, &weight_t, bias_t.as_ref(), self.stride, self.padding)
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

    /// Returns the number of input channels.
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the number of output channels.
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the kernel size (height, width).
    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }
}

impl std::fmt::Debug for CurveConv2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveConv2d")
            .field("in_channels", &self.in_channels)
            .field("out_channels", &self.out_channels)
            .field("kernel_size", &self.kernel_size)
            .field("stride", &self.stride)
            .field("padding", &self.padding)
            .field("num_bends", &self.num_bends())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_tensor::{full, ones};

    #[test]
    fn test_creation() {
        let conv = CurveConv2d::new(3, 64, 3, &[true, false, true]);
        assert_eq!(conv.num_bends(), 3);
        assert_eq!(conv.weight.shape(), vec![64, 3, 3, 3]);
        assert_eq!(conv.parameters().len(), 6);
        assert!(!conv.weight.bend(0).requires_grad());
        assert!(conv.weight.bend(1).requires_grad());
    }

    #[test]
    fn test_endpoint_matches_plain_convolution() {
        let conv = CurveConv2d::with_options(1, 1, (3, 3), (1, 1), (1, 1), false, &[false, false]);
        conv.weight.bend(0).update_data(ones(&[1, 1, 3, 3]));
        conv.weight.bend(1).update_data(full(&[1, 1, 3, 3], 5.0));

        let input = Variable::new(ones(&[1, 1, 3, 3]), false);
        let output = conv.forward_t(&input, &[1.0, 0.0]);
        let out = output.data().to_vec();
        // All-ones 3x3 kernel with padding 1: corners 4, edges 6, center 9
        assert_eq!(out[0], 4.0);
        assert_eq!(out[1], 6.0);
        assert_eq!(out[4], 9.0);
    }

    #[test]
    fn test_midpoint_blends_kernels() {
        let conv = CurveConv2d::with_options(1, 1, (1, 1), (1, 1), (0, 0), false, &[false, false]);
        conv.weight.bend(0).update_data(full(&[1, 1, 1, 1], 2.0));
        conv.weight.bend(1).update_data(full(&[1, 1, 1, 1], 4.0));

        let input = Variable::new(full(&[1, 1, 2, 2], 1.0), false);
        let output = conv.forward_t(&input, &[0.5, 0.5]);
        // Blended 1x1 kernel is 3.0
        assert_eq!(output.data().to_vec(), vec![3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_l2_tracks_blended_norm() {
        let conv = CurveConv2d::with_options(1, 1, (1, 1), (1, 1), (0, 0), false, &[false, false]);
        conv.weight.bend(0).update_data(full(&[1, 1, 1, 1], 3.0));
        conv.weight.bend(1).update_data(full(&[1, 1, 1, 1], 1.0));

        let input = Variable::new(ones(&[1, 1, 2, 2]), false);
        conv.forward_t(&input, &[1.0, 0.0]);
        assert!((conv.l2() - 9.0).abs() < 1e-6);

        conv.forward_t(&input, &[0.5, 0.5]);
        assert!((conv.l2() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_output_shape_with_stride() {
        let conv = CurveConv2d::with_options(2, 4, (3, 3), (2, 2), (1, 1), true, &[false, false]);
        let input = Variable::new(ones(&[1, 2, 8, 8]), false);
        let output = conv.forward_t(&input, &[0.5, 0.5]);
        assert_eq!(output.shape(), vec![1, 4, 4, 4]);
    }
}
