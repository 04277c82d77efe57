//! Weight Initialization - Parameter Initialization Strategies
//!
//! Provides the weight initialization strategies used by the layers in this
//! workspace. Proper initialization is crucial for training deep networks.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_tensor::Tensor;

// =============================================================================
// Basic Initializers
// =============================================================================

/// Creates a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor {
    modeconn_tensor::zeros(shape)
}

/// Creates a tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor {
    modeconn_tensor::ones(shape)
}

/// Creates a tensor filled with a constant value.
pub fn constant(shape: &[usize], value: f32) -> Tensor {
    modeconn_tensor::full(shape, value)
}

// =============================================================================
// Random Initializers
// =============================================================================

/// Creates a tensor with uniform random values in [low, high).
pub fn uniform_range(shape: &[usize], low: f32, high: f32) -> Tensor {
    modeconn_tensor::uniform(shape, low, high)
}

/// Creates a tensor with standard normal random values (mean=0, std=1).
pub fn randn(shape: &[usize]) -> Tensor {
    modeconn_tensor::randn(shape)
}

/// Creates a tensor with normal random values (specified mean and std).
pub fn normal(shape: &[usize], mean: f32, std: f32) -> Tensor {
    modeconn_tensor::normal(shape, mean, std)
}

// =============================================================================
// Xavier/Glorot Initialization
// =============================================================================

/// Xavier uniform initialization.
///
/// Designed for layers with tanh or sigmoid activations.
/// Samples from U(-a, a) where a = sqrt(6 / (fan_in + fan_out))
///
/// # Arguments
/// * `fan_in` - Number of input units
/// * `fan_out` - Number of output units
pub fn xavier_uniform(fan_in: usize, fan_out: usize) -> Tensor {
    let a = (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform_range(&[fan_out, fan_in], -a, a)
}

/// Xavier normal initialization.
///
/// Samples from N(0, std) where std = sqrt(2 / (fan_in + fan_out))
pub fn xavier_normal(fan_in: usize, fan_out: usize) -> Tensor {
    let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
    normal(&[fan_out, fan_in], 0.0, std)
}

// =============================================================================
// Kaiming/He Initialization
// =============================================================================

/// Kaiming uniform initialization.
///
/// Designed for layers with ReLU activations.
/// Samples from U(-bound, bound) where bound = sqrt(6 / fan_in)
///
/// For convolutions, pass `fan_in = in_channels * kernel_h * kernel_w` and
/// reshape the resulting `[fan_out, fan_in]` matrix to the kernel shape.
///
/// # Arguments
/// * `fan_out` - Number of output units
/// * `fan_in` - Number of input units
pub fn kaiming_uniform(fan_out: usize, fan_in: usize) -> Tensor {
    let bound = (6.0 / fan_in as f32).sqrt();
    uniform_range(&[fan_out, fan_in], -bound, bound)
}

/// Kaiming normal initialization.
///
/// Samples from N(0, std) where std = sqrt(2 / fan_in)
pub fn kaiming_normal(fan_out: usize, fan_in: usize) -> Tensor {
    let std = (2.0 / fan_in as f32).sqrt();
    normal(&[fan_out, fan_in], 0.0, std)
}

// =============================================================================
// Tests
// =============================================================================
