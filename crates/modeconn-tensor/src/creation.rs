//! Tensor Creation Functions
//!
//! Provides convenient functions for creating tensors with various
//! initializations including zeros, ones, random values, and ranges.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal, Uniform};

use crate::tensor::Tensor;

// =============================================================================
// Zero and One Initialization
// =============================================================================

/// Creates a tensor filled with zeros.
///
/// # Example
/// ```rust
/// use modeconn_tensor::zeros;
/// let t = zeros(&[2, 3]);
/// assert_eq!(t.numel(), 6);
/// ```
#[must_use] pub fn zeros(shape: &[usize]) -> Tensor {
    full(shape, 0.0)
}

/// Creates a tensor filled with ones.
#[must_use] pub fn ones(shape: &[usize]) -> Tensor {
    full(shape, 1.0)
}

/// Creates a tensor filled with a specific value.
#[must_use] pub fn full(shape: &[usize], value: f32) -> Tensor {
    let numel: usize = shape.iter().product();
    let data = vec![value; numel];
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with the same shape as another, filled with zeros.
#[must_use] pub fn zeros_like(other: &Tensor) -> Tensor {
    zeros(other.shape())
}

// =============================================================================
// Random Initialization
// =============================================================================

/// Creates a tensor with uniformly distributed random values in [0, 1).
#[must_use] pub fn rand(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f32> = (0..numel).map(|_| rng.gen()).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with normally distributed random values (mean=0, std=1).
#[must_use] pub fn randn(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let normal = StandardNormal;
    let data: Vec<f32> = (0..numel).map(|_| normal.sample(&mut rng)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with uniformly distributed random values in [low, high).
#[must_use] pub fn uniform(shape: &[usize], low: f32, high: f32) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let dist = Uniform::new(low, high);
    let data: Vec<f32> = (0..numel).map(|_| dist.sample(&mut rng)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with normally distributed random values.
///
/// # Panics
/// Panics if `std` is not finite and positive.
#[must_use] pub fn normal(shape: &[usize], mean: f32, std: f32) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let dist = Normal::new(mean, std).unwrap();
    let data: Vec<f32> = (0..numel).map(|_| dist.sample(&mut rng)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

// =============================================================================
// Range Functions
// =============================================================================

/// Creates a 1D tensor with `num` evenly spaced values from start to end.
#[must_use] pub fn linspace(start: f32, end: f32, num: usize) -> Tensor {
    if num == 0 {
        return Tensor::from_vec(vec![], &[0]).unwrap();
    }

    if num == 1 {
        return Tensor::from_vec(vec![start], &[1]).unwrap();
    }

    let step = (end - start) / (num - 1) as f32;
    let data: Vec<f32> = (0..num).map(|i| start + step * i as f32).collect();

    Tensor::from_vec(data, &[num]).unwrap()
}

// =============================================================================
// Tests
// =============================================================================
