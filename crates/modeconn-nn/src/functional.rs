//! Functional API - Stateless Neural Network Operations
//!
//! Provides functional versions of neural network operations that take
//! their weights as explicit arguments instead of owning them. Ordinary
//! layers and curve-parametrized layers both route their forward passes
//! through these functions, so the two stay numerically identical and the
//! layer structs reduce to weight containers.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_autograd::Variable;
use modeconn_tensor::Tensor;

use crate::parameter::Buffer;

// =============================================================================
// Linear
// =============================================================================

/// Linear transformation: y = x W^T + b.
///
/// `weight` has shape `[out_features, in_features]`. Inputs with more than
/// two dimensions have their leading dimensions flattened for the matmul
/// and restored afterwards. The operation is recorded in the autograd
/// graph, so gradients reach `weight` and `bias`.
pub fn linear(input: &Variable, weight: &Variable, bias: Option<&Variable>) -> Variable {
    let input_shape = input.shape();
    let weight_shape = weight.shape();
    let in_features = weight_shape[1];
    let out_features = weight_shape[0];

    let batch_dims = &input_shape[..input_shape.len() - 1];
    let total_batch: usize = batch_dims.iter().product();

    let flat = if input_shape.len() > 2 {
        input.reshape(&[total_batch, in_features])
    } else {
        input.clone()
    };

    let weight_t = weight.transpose(0, 1);
    let mut output = flat.matmul(&weight_t);
    if let Some(b) = bias {
        output = output.add_var(b);
    }

    if input_shape.len() > 2 {
        let mut out_shape: Vec<usize> = batch_dims.to_vec();
        out_shape.push(out_features);
        output = output.reshape(&out_shape);
    }

    output
}

// =============================================================================
// Convolution
// =============================================================================

/// 2D convolution over an NCHW input.
///
/// `weight` has shape `[out_channels, in_channels, kernel_h, kernel_w]`;
/// kernel size and channel counts are read from it. Direct-loop
/// implementation with zero padding.
///
/// # Shape
/// - Input: (N, C_in, H, W)
/// - Output: (N, C_out, H_out, W_out)
///
/// where H_out = (H + 2*padding - kernel_h) / stride + 1
pub fn conv2d(
    input: &Variable,
    weight: &Tensor,
    bias: Option<&Tensor>,
    stride: (usize, usize),
    padding: (usize, usize),
) -> Variable {
    let input_shape = input.shape();
    let batch_size = input_shape[0];
    let in_height = input_shape[2];
    let in_width = input_shape[3];

    let weight_shape = weight.shape().to_vec();
    let out_channels = weight_shape[0];
    let in_channels = weight_shape[1];
    let (kh, kw) = (weight_shape[2], weight_shape[3]);
    let (sh, sw) = stride;
    let (ph, pw) = padding;

    assert_eq!(
        input_shape[1], in_channels,
        "conv2d: expected {} input channels, got {}",
        in_channels, input_shape[1]
    );

    let out_height = (in_height + 2 * ph - kh) / sh + 1;
    let out_width = (in_width + 2 * pw - kw) / sw + 1;

    let input_data = input.data();
    let input_vec = input_data.to_vec();
    let weight_vec = weight.to_vec();
    let bias_vec = bias.map(Tensor::to_vec);

    let mut output_data = vec![0.0f32; batch_size * out_channels * out_height * out_width];

    for b in 0..batch_size {
        for oc in 0..out_channels {
            for oh in 0..out_height {
                for ow in 0..out_width {
                    let mut sum = 0.0f32;

                    for ic in 0..in_channels {
                        for ki in 0..kh {
                            for kj in 0..kw {
                                let ih = oh * sh + ki;
                                let iw = ow * sw + kj;

                                // Handle padding
                                if ih < ph
                                    || ih >= in_height + ph
                                    || iw < pw
                                    || iw >= in_width + pw
                                {
                                    continue;
                                }

                                let actual_ih = ih - ph;
                                let actual_iw = iw - pw;

                                let input_idx = b * in_channels * in_height * in_width
                                    + ic * in_height * in_width
                                    + actual_ih * in_width
                                    + actual_iw;

                                let weight_idx =
                                    oc * in_channels * kh * kw + ic * kh * kw + ki * kw + kj;

                                sum += input_vec[input_idx] * weight_vec[weight_idx];
                            }
                        }
                    }

                    if let Some(ref bv) = bias_vec {
                        sum += bv[oc];
                    }

                    let output_idx = b * out_channels * out_height * out_width
                        + oc * out_height * out_width
                        + oh * out_width
                        + ow;
                    output_data[output_idx] = sum;
                }
            }
        }
    }

    let output_tensor = Tensor::from_vec(
        output_data,
        &[batch_size, out_channels, out_height, out_width],
    )
    .unwrap();

    Variable::new(output_tensor, input.requires_grad())
}

// =============================================================================
// Batch Normalization
// =============================================================================

/// Batch normalization over the channel dimension of an (N, C, ...) input.
///
/// During training, batch statistics are used and the running statistics
/// are updated in place: running = (1 - momentum) * running + momentum *
/// batch. During evaluation, the running statistics are used.
///
/// `weight` (gamma) and `bias` (beta) have shape `[num_features]`.
pub fn batch_norm(
    input: &Variable,
    running_mean: &Buffer,
    running_var: &Buffer,
    weight: &Tensor,
    bias: &Tensor,
    training: bool,
    momentum: f32,
    eps: f32,
) -> Variable {
    let input_data = input.data();
    let shape = input_data.shape().to_vec();
    let batch_size = shape[0];
    let num_features = shape[1];
    let spatial_size: usize = if shape.len() > 2 {
        shape[2..].iter().product()
    } else {
        1
    };

    let input_vec = input_data.to_vec();
    let weight_vec = weight.to_vec();
    let bias_vec = bias.to_vec();

    let mut means = vec![0.0f32; num_features];
    let mut vars = vec![0.0f32; num_features];

    if training {
        // Calculate batch statistics
        let count = (batch_size * spatial_size) as f32;
        for c in 0..num_features {
            let mut sum = 0.0f32;
            for b in 0..batch_size {
                for s in 0..spatial_size {
                    let idx = b * num_features * spatial_size + c * spatial_size + s;
                    sum += input_vec[idx];
                }
            }
            means[c] = sum / count;

            let mut var_sum = 0.0f32;
            for b in 0..batch_size {
                for s in 0..spatial_size {
                    let idx = b * num_features * spatial_size + c * spatial_size + s;
                    let diff = input_vec[idx] - means[c];
                    var_sum += diff * diff;
                }
            }
            vars[c] = var_sum / count;
        }

        // Update running statistics
        let new_mean: Vec<f32> = running_mean
            .data()
            .to_vec()
            .iter()
            .zip(means.iter())
            .map(|(&rm, &m)| (1.0 - momentum) * rm + momentum * m)
            .collect();
        let new_var: Vec<f32> = running_var
            .data()
            .to_vec()
            .iter()
            .zip(vars.iter())
            .map(|(&rv, &v)| (1.0 - momentum) * rv + momentum * v)
            .collect();

        running_mean.set_data(Tensor::from_vec(new_mean, &[num_features]).unwrap());
        running_var.set_data(Tensor::from_vec(new_var, &[num_features]).unwrap());
    } else {
        means = running_mean.data().to_vec();
        vars = running_var.data().to_vec();
    }

    // Normalize: y = (x - mean) / sqrt(var + eps) * weight + bias
    let mut output_vec = vec![0.0f32; input_vec.len()];
    for b in 0..batch_size {
        for c in 0..num_features {
            for s in 0..spatial_size {
                let idx = b * num_features * spatial_size + c * spatial_size + s;
                let normalized = (input_vec[idx] - means[c]) / (vars[c] + eps).sqrt();
                output_vec[idx] = normalized * weight_vec[c] + bias_vec[c];
            }
        }
    }

    let output = Tensor::from_vec(output_vec, &shape).unwrap();
    Variable::new(output, input.requires_grad())
}

// =============================================================================
// Activations
// =============================================================================

/// ReLU activation function.
pub fn relu(input: &Variable) -> Variable {
    input.relu()
}

// =============================================================================
// Dropout
// =============================================================================

/// Inverted dropout: zeros elements with probability `p` and scales the
/// survivors by 1 / (1 - p). Identity when not training or `p` is zero.
pub fn dropout(input: &Variable, p: f32, training: bool) -> Variable {
    if !training || p == 0.0 {
        return input.clone();
    }

    let data = input.data();
    let data_vec = data.to_vec();
    let scale = 1.0 / (1.0 - p);

    let mut rng = rand::thread_rng();
    use rand::Rng;

    let result: Vec<f32> = data_vec
        .iter()
        .map(|&x| if rng.gen::<f32>() < p { 0.0 } else { x * scale })
        .collect();

    Variable::new(
        Tensor::from_vec(result, data.shape()).unwrap(),
        input.requires_grad(),
    )
}

// =============================================================================
// Tests
// =============================================================================
