//! VGG - Very Deep Convolutional Networks with Curve Variants
//!
//! Implements the VGG16 and VGG19 architectures with a configurable width
//! multiplier, in two renditions: the plain classifier (`VggBase`) and a
//! curve-parametrized twin (`VggCurve`) whose learnable layers carry one
//! weight set per bend of a weight-space curve. The two renditions expose
//! their parameters and buffers in the same order, so a curve network can
//! seed its endpoint bends directly from trained plain models.
//!
//! # Reference
//! <https://arxiv.org/abs/1409.1556>
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_autograd::Variable;
use modeconn_curves::{CurveBatchNorm2d, CurveConv2d, CurveLinear, CurveModel};
use modeconn_nn::{
    BatchNorm2d, Buffer, Conv2d, Dropout, InstanceNorm1d, Linear, MaxPool2d, Module, Parameter,
    ReLU,
};
use modeconn_tensor::{normal, zeros, Tensor};

// =============================================================================
// Configuration
// =============================================================================

/// Per-stage channel widths of a VGG feature stack.
///
/// Depth 16 scales with the width multiplier `k`: two stages two
/// convolutions deep at `k` and `2 * k` channels, then three stages three
/// convolutions deep at `4 * k` and `8 * k` channels. Any other depth yields
/// the classic depth-19 table with fixed widths, ignoring `k`.
pub fn vgg_stages(depth: usize, k: usize) -> Vec<Vec<usize>> {
    if depth == 16 {
        vec![
            vec![k, k],
            vec![2 * k, 2 * k],
            vec![4 * k, 4 * k, 4 * k],
            vec![8 * k, 8 * k, 8 * k],
            vec![8 * k, 8 * k, 8 * k],
        ]
    } else {
        vec![
            vec![64, 64],
            vec![128, 128],
            vec![256, 256, 256, 256],
            vec![512, 512, 512, 512],
            vec![512, 512, 512, 512],
        ]
    }
}

/// Total parameter count of the width-`k` depth-16 model.
///
/// Counted in closed form over the thirteen convolutions and the three
/// fully connected layers. The first group collects the terms linear in `k`
/// (the input-facing kernel, every bias, the output weight), the second the
/// terms quadratic in `k` (the remaining kernels and the hidden weights),
/// with each width expressed as its multiple of `k`.
pub fn vgg16_size(k: usize, num_classes: usize) -> usize {
    (3 * 9 + 2 + 2 * 2 + 4 * 3 + 8 * 8 + 8 * num_classes) * k
        + ((1 + 2 + 2 * 2 + 4 * 2 + 2 * 4 * 4 + 8 * 4 + 5 * 8 * 8) * 9 + 2 * 8 * 8) * k * k
        + num_classes
}

/// Width multiplier whose depth-16 model comes closest to the requested
/// parameter count.
///
/// Inverts `vgg16_size` by solving the underlying quadratic for its positive
/// root and rounding to the nearest integer.
pub fn vgg16_compute_k(num_parameters: usize, num_classes: usize) -> usize {
    let a = ((1 + 2 + 2 * 2 + 4 * 2 + 2 * 4 * 4 + 8 * 4 + 5 * 8 * 8) * 9 + 2 * 8 * 8) as f64;
    let b = (3 * 9 + 2 + 2 * 2 + 4 * 3 + 8 * 8 + 8 * num_classes) as f64;
    let c = num_classes as f64;
    let n = num_parameters as f64;

    let k = (-b + (4.0 * a * n + b * b - 4.0 * a * c).sqrt()) / (2.0 * a);
    k.round() as usize
}

// =============================================================================
// VggFeatures
// =============================================================================

enum VggFeatureLayer {
    Conv(Conv2d),
    BatchNorm(BatchNorm2d),
    ReLU(ReLU),
    MaxPool(MaxPool2d),
}

/// Convolutional feature stack of a VGG network.
///
/// Each stage is a run of 3x3 same-padded convolutions, each optionally
/// followed by batch normalization and always by ReLU, and ends with 2x2
/// max pooling. The input is expected to have three channels.
pub struct VggFeatures {
    layers: Vec<VggFeatureLayer>,
}

impl VggFeatures {
    /// Builds the feature stack for the given stage table.
    ///
    /// Convolution weights are redrawn from N(0, sqrt(2 / n)) with
    /// n = kernel_h * kernel_w * out_channels; biases stay zero.
    pub fn new(stages: &[Vec<usize>], batch_norm: bool) -> Self {
        let mut layers = Vec::new();
        let mut in_channels = 3;

        for sizes in stages {
            for &channels in sizes {
                let conv =
                    Conv2d::with_options(in_channels, channels, (3, 3), (1, 1), (1, 1), true);
                let std = (2.0 / (3 * 3 * channels) as f32).sqrt();
                conv.weight
                    .update_data(normal(&[channels, in_channels, 3, 3], 0.0, std));
                layers.push(VggFeatureLayer::Conv(conv));
                if batch_norm {
                    layers.push(VggFeatureLayer::BatchNorm(BatchNorm2d::new(channels)));
                }
                layers.push(VggFeatureLayer::ReLU(ReLU));
                in_channels = channels;
            }
            layers.push(VggFeatureLayer::MaxPool(MaxPool2d::new(2)));
        }

        Self { layers }
    }
}

impl Module for VggFeatures {
    fn forward(&self, input: &Variable) -> Variable {
        let mut out = input.clone();
        for layer in &self.layers {
            out = match layer {
                VggFeatureLayer::Conv(conv) => conv.forward(&out),
                VggFeatureLayer::BatchNorm(bn) => bn.forward(&out),
                VggFeatureLayer::ReLU(relu) => relu.forward(&out),
                VggFeatureLayer::MaxPool(pool) => pool.forward(&out),
            };
        }
        out
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        for layer in &self.layers {
            match layer {
                VggFeatureLayer::Conv(conv) => params.extend(conv.parameters()),
                VggFeatureLayer::BatchNorm(bn) => params.extend(bn.parameters()),
                _ => {}
            }
        }
        params
    }

    fn buffers(&self) -> Vec<Buffer> {
        let mut buffers = Vec::new();
        for layer in &self.layers {
            if let VggFeatureLayer::BatchNorm(bn) = layer {
                buffers.extend(bn.buffers());
            }
        }
        buffers
    }

    fn set_training(&mut self, training: bool) {
        for layer in &mut self.layers {
            if let VggFeatureLayer::BatchNorm(bn) = layer {
                bn.set_training(training);
            }
        }
    }

    fn is_training(&self) -> bool {
        for layer in &self.layers {
            if let VggFeatureLayer::BatchNorm(bn) = layer {
                return bn.is_training();
            }
        }
        true
    }

    fn name(&self) -> &'static str {
        "VggFeatures"
    }
}

// =============================================================================
// VggClassifier
// =============================================================================

/// Fully connected classification head of a VGG network.
///
/// Dropout, then two hidden layers of `hidden` units with ReLU and dropout
/// between them, then the output layer.
pub struct VggClassifier {
    dropout: Dropout,
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    relu: ReLU,
}

impl VggClassifier {
    /// Creates the classification head.
    pub fn new(in_features: usize, hidden: usize, num_classes: usize, p: f32) -> Self {
        Self {
            dropout: Dropout::new(p),
            fc1: Linear::new(in_features, hidden),
            fc2: Linear::new(hidden, hidden),
            fc3: Linear::new(hidden, num_classes),
            relu: ReLU,
        }
    }
}

impl Module for VggClassifier {
    fn forward(&self, input: &Variable) -> Variable {
        let out = self.dropout.forward(input);
        let out = self.relu.forward(&self.fc1.forward(&out));
        let out = self.dropout.forward(&out);
        let out = self.relu.forward(&self.fc2.forward(&out));
        self.fc3.forward(&out)
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = self.fc1.parameters();
        params.extend(self.fc2.parameters());
        params.extend(self.fc3.parameters());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.dropout.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.dropout.is_training()
    }

    fn name(&self) -> &'static str {
        "VggClassifier"
    }
}

// =============================================================================
// VggBase
// =============================================================================

/// VGG image classifier.
///
/// # Shape
/// - Input: (N, 3, H, W) with H and W divisible by 32
/// - Output: (N, `num_classes`)
pub struct VggBase {
    features: VggFeatures,
    classifier: VggClassifier,
    normalization: Option<InstanceNorm1d>,
    num_classes: usize,
}

impl VggBase {
    /// Creates the classic width-64 depth-16 model.
    pub fn new(num_classes: usize) -> Self {
        Self::with_options(num_classes, 16, false, 64, 0.5, false)
    }

    /// Creates a model with all options.
    ///
    /// Depth 16 scales all channel widths with `k` and sizes the hidden
    /// head layers at `8 * k` units; any other depth uses the fixed-width
    /// depth-19 table. `p` is the dropout probability of the head.
    /// `use_instance_norm` normalizes the logits of each sample to zero
    /// mean and unit variance.
    pub fn with_options(
        num_classes: usize,
        depth: usize,
        batch_norm: bool,
        k: usize,
        p: f32,
        use_instance_norm: bool,
    ) -> Self {
        let stages = vgg_stages(depth, k);
        let last_stage = &stages[stages.len() - 1];
        let in_features = last_stage[last_stage.len() - 1];

        let features = VggFeatures::new(&stages, batch_norm);
        let classifier = VggClassifier::new(in_features, 8 * k, num_classes, p);
        let normalization = if use_instance_norm {
            Some(InstanceNorm1d::new(num_classes))
        } else {
            None
        };

        Self {
            features,
            classifier,
            normalization,
            num_classes,
        }
    }

    /// Returns the number of output classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

impl Module for VggBase {
    fn forward(&self, input: &Variable) -> Variable {
        let out = self.features.forward(input);
        let out = flatten(&out);
        let out = self.classifier.forward(&out);

        match &self.normalization {
            Some(norm) => {
                let batch_size = out.shape()[0];
                let viewed = out.reshape(&[batch_size, 1, self.num_classes]);
                let normalized = norm.forward(&viewed);
                normalized.reshape(&[batch_size, self.num_classes])
            }
            None => out,
        }
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = self.features.parameters();
        params.extend(self.classifier.parameters());
        params
    }

    fn buffers(&self) -> Vec<Buffer> {
        self.features.buffers()
    }

    fn set_training(&mut self, training: bool) {
        self.features.set_training(training);
        self.classifier.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.classifier.is_training()
    }

    fn name(&self) -> &'static str {
        "VggBase"
    }
}

// =============================================================================
// VggCurve
// =============================================================================

enum VggCurveLayer {
    Conv(CurveConv2d),
    BatchNorm(CurveBatchNorm2d),
    ReLU(ReLU),
    MaxPool(MaxPool2d),
}

/// Curve-parametrized VGG classifier.
///
/// Mirrors `VggBase` layer for layer with every learnable layer replaced by
/// its multi-bend counterpart, and evaluates the whole network at the curve
/// position described by the blending coefficients passed to `forward_t`.
/// Parameters and buffers come out in the same order as those of the
/// matching `VggBase`.
pub struct VggCurve {
    features: Vec<VggCurveLayer>,
    dropout: Dropout,
    fc1: CurveLinear,
    fc2: CurveLinear,
    fc3: CurveLinear,
    relu: ReLU,
    num_bends: usize,
}

impl VggCurve {
    /// Creates the width-64 depth-16 curve model.
    pub fn new(num_classes: usize, fixed: &[bool]) -> Self {
        Self::with_options(num_classes, fixed, 16, false, 64)
    }

    /// Creates a curve model with all options.
    ///
    /// `fixed` marks the bends whose parameters stay frozen, one entry per
    /// bend. Every bend of every convolution is redrawn from
    /// N(0, sqrt(2 / n)) with n = kernel_h * kernel_w * out_channels and
    /// zero bias, matching the plain model's initialization.
    pub fn with_options(
        num_classes: usize,
        fixed: &[bool],
        depth: usize,
        batch_norm: bool,
        k: usize,
    ) -> Self {
        let stages = vgg_stages(depth, k);
        let mut features = Vec::new();
        let mut in_channels = 3;

        for sizes in &stages {
            for &channels in sizes {
                let conv = CurveConv2d::with_options(
                    in_channels,
                    channels,
                    (3, 3),
                    (1, 1),
                    (1, 1),
                    true,
                    fixed,
                );
                let std = (2.0 / (3 * 3 * channels) as f32).sqrt();
                conv.weight
                    .reset_with(|| normal(&[channels, in_channels, 3, 3], 0.0, std));
                if let Some(ref bias) = conv.bias {
                    bias.reset_with(|| zeros(&[channels]));
                }
                features.push(VggCurveLayer::Conv(conv));
                if batch_norm {
                    features.push(VggCurveLayer::BatchNorm(CurveBatchNorm2d::new(
                        channels, fixed,
                    )));
                }
                features.push(VggCurveLayer::ReLU(ReLU));
                in_channels = channels;
            }
            features.push(VggCurveLayer::MaxPool(MaxPool2d::new(2)));
        }

        let hidden = 8 * k;

        Self {
            features,
            dropout: Dropout::default_p(),
            fc1: CurveLinear::new(in_channels, hidden, fixed),
            fc2: CurveLinear::new(hidden, hidden, fixed),
            fc3: CurveLinear::new(hidden, num_classes, fixed),
            relu: ReLU,
            num_bends: fixed.len(),
        }
    }
}

impl CurveModel for VggCurve {
    fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable {
        let mut out = input.clone();
        for layer in &self.features {
            out = match layer {
                VggCurveLayer::Conv(conv) => conv.forward_t(&out, coeffs),
                VggCurveLayer::BatchNorm(bn) => bn.forward_t(&out, coeffs),
                VggCurveLayer::ReLU(relu) => relu.forward(&out),
                VggCurveLayer::MaxPool(pool) => pool.forward(&out),
            };
        }
        let out = flatten(&out);

        let out = self.dropout.forward(&out);
        let out = self.relu.forward(&self.fc1.forward_t(&out, coeffs));
        let out = self.dropout.forward(&out);
        let out = self.relu.forward(&self.fc2.forward_t(&out, coeffs));
        self.fc3.forward_t(&out, coeffs)
    }

    fn num_bends(&self) -> usize {
        self.num_bends
    }

    fn parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        for layer in &self.features {
            match layer {
                VggCurveLayer::Conv(conv) => params.extend(conv.parameters()),
                VggCurveLayer::BatchNorm(bn) => params.extend(bn.parameters()),
                _ => {}
            }
        }
        params.extend(self.fc1.parameters());
        params.extend(self.fc2.parameters());
        params.extend(self.fc3.parameters());
        params
    }

    fn bend_parameters(&self, index: usize) -> Vec<Parameter> {
        let mut params = Vec::new();
        for layer in &self.features {
            match layer {
                VggCurveLayer::Conv(conv) => params.extend(conv.bend_parameters(index)),
                VggCurveLayer::BatchNorm(bn) => params.extend(bn.bend_parameters(index)),
                _ => {}
            }
        }
        params.extend(self.fc1.bend_parameters(index));
        params.extend(self.fc2.bend_parameters(index));
        params.extend(self.fc3.bend_parameters(index));
        params
    }

    fn blended_parameters(&self, coeffs: &[f32]) -> Vec<Tensor> {
        let mut tensors = Vec::new();
        for layer in &self.features {
            match layer {
                VggCurveLayer::Conv(conv) => tensors.extend(conv.blended_parameters(coeffs)),
                VggCurveLayer::BatchNorm(bn) => tensors.extend(bn.blended_parameters(coeffs)),
                _ => {}
            }
        }
        tensors.extend(self.fc1.blended_parameters(coeffs));
        tensors.extend(self.fc2.blended_parameters(coeffs));
        tensors.extend(self.fc3.blended_parameters(coeffs));
        tensors
    }

    fn buffers(&self) -> Vec<Buffer> {
        let mut buffers = Vec::new();
        for layer in &self.features {
            if let VggCurveLayer::BatchNorm(bn) = layer {
                buffers.extend(bn.buffers());
            }
        }
        buffers
    }

    fn l2(&self) -> f32 {
        let mut total = 0.0;
        for layer in &self.features {
            match layer {
                VggCurveLayer::Conv(conv) => total += conv.l2(),
                VggCurveLayer::BatchNorm(bn) => total += bn.l2(),
                _ => {}
            }
        }
        total + self.fc1.l2() + self.fc2.l2() + self.fc3.l2()
    }

    fn set_training(&mut self, training: bool) {
        for layer in &mut self.features {
            if let VggCurveLayer::BatchNorm(bn) = layer {
                bn.set_training(training);
            }
        }
        self.dropout.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.dropout.is_training()
    }
}

// =============================================================================
// VggArchitecture
// =============================================================================

/// Descriptor pairing a network depth with a normalization choice.
///
/// The four classic variants are provided as constants; each descriptor
/// builds matching plain and curve models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VggArchitecture {
    /// Network depth, either 16 or 19.
    pub depth: usize,
    /// Whether every convolution is followed by batch normalization.
    pub batch_norm: bool,
}

/// VGG16 without batch normalization.
pub const VGG16: VggArchitecture = VggArchitecture {
    depth: 16,
    batch_norm: false,
};

/// VGG16 with batch normalization.
pub const VGG16BN: VggArchitecture = VggArchitecture {
    depth: 16,
    batch_norm: true,
};

/// VGG19 without batch normalization.
pub const VGG19: VggArchitecture = VggArchitecture {
    depth: 19,
    batch_norm: false,
};

/// VGG19 with batch normalization.
pub const VGG19BN: VggArchitecture = VggArchitecture {
    depth: 19,
    batch_norm: true,
};

impl VggArchitecture {
    /// Builds the plain model with width multiplier `k`.
    pub fn base(&self, num_classes: usize, k: usize) -> VggBase {
        VggBase::with_options(num_classes, self.depth, self.batch_norm, k, 0.5, false)
    }

    /// Builds the curve model with width multiplier `k`.
    pub fn curve(&self, num_classes: usize, fixed: &[bool], k: usize) -> VggCurve {
        VggCurve::with_options(num_classes, fixed, self.depth, self.batch_norm, k)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Flattens the spatial dimensions: (N, C, H, W) becomes (N, C * H * W).
fn flatten(input: &Variable) -> Variable {
    let shape = input.shape();
    if shape.len() <= 2 {
        return input.clone();
    }
    let batch_size = shape[0];
    let num_features: usize = shape[1..].iter().product();
    input.reshape(&[batch_size, num_features])
}

// =============================================================================
// Tests
// =============================================================================
