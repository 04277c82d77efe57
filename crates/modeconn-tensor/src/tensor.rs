//! Tensor - N-Dimensional f32 Array
//!
//! The core tensor type: a shape/strides view over reference-counted
//! storage. Clones share storage; views (reshape, transpose, squeeze)
//! are zero-copy where contiguity allows.
//!
//! # Example
//! ```rust
//! use modeconn_tensor::Tensor;
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let b = a.mul_scalar(2.0);
//! assert_eq!(b.to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use crate::backend::CpuBackend;
use crate::error::{Error, Result};
use crate::shape::{
    broadcast_shape, broadcast_strides, contiguous_strides, is_contiguous, linear_index,
    normalize_dim, numel, reshape, squeeze, transpose_shape, transpose_strides, unravel_index,
    unsqueeze, validate_indices, Shape, Strides,
};
use crate::storage::Storage;

// =============================================================================
// Tensor Struct
// =============================================================================

/// An n-dimensional array of f32 values.
///
/// A tensor is a view into reference-counted storage described by a shape,
/// per-dimension strides, and an element offset. Cloning a tensor is cheap
/// and shares the underlying storage.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub(crate) storage: Storage,
    pub(crate) shape: Shape,
    pub(crate) strides: Strides,
    pub(crate) offset: usize,
}

// =============================================================================
// Construction
// =============================================================================

impl Tensor {
    /// Creates a tensor from storage and a shape.
    ///
    /// # Returns
    /// Error if the storage length does not match the shape's element count.
    pub fn from_storage(storage: Storage, shape: &[usize]) -> Result<Self> {
        let expected = numel(shape);
        if storage.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[storage.len()]));
        }

        Ok(Self {
            storage,
            shape: shape.iter().copied().collect(),
            strides: contiguous_strides(shape),
            offset: 0,
        })
    }

    /// Creates a tensor from a vector of data and a shape.
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Self> {
        Self::from_storage(Storage::from_vec(data), shape)
    }

    /// Creates a tensor from a slice of data and a shape.
    pub fn from_slice(data: &[f32], shape: &[usize]) -> Result<Self> {
        Self::from_storage(Storage::from_slice(data), shape)
    }

    /// Creates a 0-dimensional (scalar) tensor.
    #[must_use]
    pub fn scalar(value: f32) -> Self {
        Self {
            storage: Storage::from_vec(vec![value]),
            shape: Shape::new(),
            strides: Strides::new(),
            offset: 0,
        }
    }
}

// =============================================================================
// Shape and Metadata
// =============================================================================

impl Tensor {
    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true if the tensor has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns the size of a dimension, negative indices count from the end.
    pub fn size(&self, dim: i64) -> Result<usize> {
        let d = normalize_dim(dim, self.ndim())?;
        Ok(self.shape[d])
    }

    /// Returns true if the tensor is row-major contiguous.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Returns true if the tensor is 0-dimensional.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

// =============================================================================
// Element Access
// =============================================================================

impl Tensor {
    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<f32> {
        validate_indices(indices, &self.shape)?;
        let idx = self.offset as isize + linear_index(indices, &self.strides);
        Ok(self.storage.as_slice()[idx as usize])
    }

    /// Sets the element at the given indices.
    pub fn set(&self, indices: &[usize], value: f32) -> Result<()> {
        validate_indices(indices, &self.shape)?;
        let idx = self.offset as isize + linear_index(indices, &self.strides);
        self.storage.as_slice_mut()[idx as usize] = value;
        Ok(())
    }

    /// Returns the single element of a one-element tensor.
    pub fn item(&self) -> Result<f32> {
        if self.numel() != 1 {
            return Err(Error::invalid_operation(format!(
                "item() requires a single-element tensor, got {} elements",
                self.numel()
            )));
        }
        Ok(self.storage.as_slice()[self.offset])
    }

    /// Copies the tensor data into a contiguous vector in row-major order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        let data = self.storage.as_slice();

        if self.is_contiguous() && self.offset == 0 {
            return data.to_vec();
        }

        let n = self.numel();
        let mut result = Vec::with_capacity(n);
        for i in 0..n {
            let indices = unravel_index(i, &self.shape);
            let idx = self.offset as isize + linear_index(&indices, &self.strides);
            result.push(data[idx as usize]);
        }
        result
    }
}

// =============================================================================
// Shape Transformations
// =============================================================================

impl Tensor {
    /// Returns a reshaped tensor, sharing storage when contiguous.
    ///
    /// One dimension may be -1 and is inferred from the element count.
    pub fn reshape(&self, new_shape: &[isize]) -> Result<Self> {
        let shape = reshape(&self.shape, new_shape)?;

        if self.is_contiguous() && self.offset == 0 {
            let strides = contiguous_strides(&shape);
            return Ok(Self {
                storage: self.storage.clone(),
                shape,
                strides,
                offset: 0,
            });
        }

        // Non-contiguous views materialize first
        let data = self.to_vec();
        Self::from_vec(data, &shape)
    }

    /// Flattens the tensor to one dimension.
    #[must_use]
    pub fn flatten(&self) -> Self {
        self.reshape(&[-1]).expect("Flatten should never fail")
    }

    /// Removes a size-1 dimension, or all of them when `dim` is None.
    pub fn squeeze(&self, dim: Option<i64>) -> Result<Self> {
        let normalized = match dim {
            Some(d) => Some(normalize_dim(d, self.ndim())?),
            None => None,
        };
        let shape = squeeze(&self.shape, normalized)?;

        let contig = self.contiguous();
        let strides = contiguous_strides(&shape);
        Ok(Self {
            storage: contig.storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Inserts a size-1 dimension at the given position.
    pub fn unsqueeze(&self, dim: i64) -> Result<Self> {
        let normalized = if dim < 0 {
            (dim + self.ndim() as i64 + 1) as usize
        } else {
            dim as usize
        };
        let shape = unsqueeze(&self.shape, normalized)?;

        let contig = self.contiguous();
        let strides = contiguous_strides(&shape);
        Ok(Self {
            storage: contig.storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Transposes two dimensions without copying data.
    pub fn transpose(&self, dim0: i64, dim1: i64) -> Result<Self> {
        let d0 = normalize_dim(dim0, self.ndim())?;
        let d1 = normalize_dim(dim1, self.ndim())?;

        let new_shape = transpose_shape(&self.shape, d0, d1)?;
        let new_strides = transpose_strides(&self.strides, d0, d1);

        Ok(Self {
            storage: self.storage.clone(),
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Returns the transpose of a 2D tensor.
    pub fn t(&self) -> Result<Self> {
        if self.ndim() != 2 {
            return Err(Error::invalid_operation("t() only works on 2D tensors"));
        }
        self.transpose(0, 1)
    }

    /// Returns a contiguous copy of the tensor.
    #[must_use]
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && self.offset == 0 {
            return self.clone();
        }

        let data = self.to_vec();
        Self::from_vec(data, &self.shape).expect("Contiguous should never fail")
    }

    /// Creates a deep copy with its own storage.
    #[must_use]
    pub fn clone_deep(&self) -> Self {
        let data = self.to_vec();
        Self::from_vec(data, &self.shape).expect("Deep clone should never fail")
    }
}

// =============================================================================
// In-place Operations
// =============================================================================

impl Tensor {
    /// Fills the tensor with a value.
    pub fn fill_(&self, value: f32) {
        let mut data = self.storage.as_slice_mut();
        CpuBackend::fill(&mut data, value);
    }

    /// Fills the tensor with zeros.
    pub fn zero_(&self) {
        self.fill_(0.0);
    }
}

// =============================================================================
// Reductions
// =============================================================================

impl Tensor {
    /// Returns the sum of all elements as a scalar tensor.
    #[must_use]
    pub fn sum(&self) -> Self {
        let data = self.to_vec();
        Self::scalar(CpuBackend::sum(&data))
    }

    /// Returns the mean of all elements as a scalar tensor.
    pub fn mean(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::sum(&data) / data.len() as f32))
    }

    /// Returns the maximum element as a scalar tensor.
    pub fn max(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::max(&data).unwrap()))
    }

    /// Returns the minimum element as a scalar tensor.
    pub fn min(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(Self::scalar(CpuBackend::min(&data).unwrap()))
    }

    /// Returns the flat index of the maximum element.
    pub fn argmax(&self) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::EmptyTensor);
        }
        let data = self.to_vec();
        Ok(CpuBackend::argmax(&data).unwrap())
    }
}

// =============================================================================
// Unary Math
// =============================================================================

impl Tensor {
    /// Applies ReLU: max(0, x).
    #[must_use]
    pub fn relu(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::relu(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Applies element-wise square root.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::sqrt(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Applies the logistic sigmoid: 1 / (1 + exp(-x)).
    #[must_use]
    pub fn sigmoid(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::sigmoid(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Applies the hyperbolic tangent.
    #[must_use]
    pub fn tanh(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::tanh(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Raises each element to a power.
    #[must_use]
    pub fn pow(&self, exponent: f32) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::pow(&mut result, &data, exponent);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Negates each element.
    #[must_use]
    pub fn neg(&self) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::neg(&mut result, &data);
        Self::from_vec(result, &self.shape).unwrap()
    }
}

// =============================================================================
// Binary Math
// =============================================================================

impl Tensor {
    /// Adds two tensors element-wise with broadcasting.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.shape == other.shape {
            let a = self.to_vec();
            let b = other.to_vec();
            let mut result = vec![0.0; a.len()];
            CpuBackend::add(&mut result, &a, &b);
            return Self::from_vec(result, &self.shape);
        }
        self.broadcast_op(other, |x, y| x + y)
    }

    /// Subtracts two tensors element-wise with broadcasting.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if self.shape == other.shape {
            let a = self.to_vec();
            let b = other.to_vec();
            let mut result = vec![0.0; a.len()];
            CpuBackend::sub(&mut result, &a, &b);
            return Self::from_vec(result, &self.shape);
        }
        self.broadcast_op(other, |x, y| x - y)
    }

    /// Multiplies two tensors element-wise with broadcasting.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.shape == other.shape {
            let a = self.to_vec();
            let b = other.to_vec();
            let mut result = vec![0.0; a.len()];
            CpuBackend::mul(&mut result, &a, &b);
            return Self::from_vec(result, &self.shape);
        }
        self.broadcast_op(other, |x, y| x * y)
    }

    /// Divides two tensors element-wise with broadcasting.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if self.shape == other.shape {
            let a = self.to_vec();
            let b = other.to_vec();
            let mut result = vec![0.0; a.len()];
            CpuBackend::div(&mut result, &a, &b);
            return Self::from_vec(result, &self.shape);
        }
        self.broadcast_op(other, |x, y| x / y)
    }

    /// Element-wise binary op over the broadcast of both operands.
    fn broadcast_op(&self, other: &Self, op: impl Fn(f32, f32) -> f32) -> Result<Self> {
        let result_shape = broadcast_shape(&self.shape, &other.shape)?;

        let a = self.to_vec();
        let b = other.to_vec();
        let a_strides = broadcast_strides(&self.shape, &contiguous_strides(&self.shape), &result_shape);
        let b_strides =
            broadcast_strides(&other.shape, &contiguous_strides(&other.shape), &result_shape);

        let n = numel(&result_shape);
        let mut result = Vec::with_capacity(n);
        for i in 0..n {
            let indices = unravel_index(i, &result_shape);
            let ai = linear_index(&indices, &a_strides) as usize;
            let bi = linear_index(&indices, &b_strides) as usize;
            result.push(op(a[ai], b[bi]));
        }

        Self::from_vec(result, &result_shape)
    }

    /// Adds a scalar to each element.
    #[must_use]
    pub fn add_scalar(&self, scalar: f32) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::add_scalar(&mut result, &data, scalar);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Subtracts a scalar from each element.
    #[must_use]
    pub fn sub_scalar(&self, scalar: f32) -> Self {
        self.add_scalar(-scalar)
    }

    /// Multiplies each element by a scalar.
    #[must_use]
    pub fn mul_scalar(&self, scalar: f32) -> Self {
        let data = self.to_vec();
        let mut result = vec![0.0; data.len()];
        CpuBackend::mul_scalar(&mut result, &data, scalar);
        Self::from_vec(result, &self.shape).unwrap()
    }

    /// Divides each element by a scalar.
    #[must_use]
    pub fn div_scalar(&self, scalar: f32) -> Self {
        self.mul_scalar(1.0 / scalar)
    }
}

// =============================================================================
// Linear Algebra
// =============================================================================

impl Tensor {
    /// Matrix multiplication of two 2D tensors.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.ndim() != 2 || other.ndim() != 2 {
            return Err(Error::invalid_operation(format!(
                "matmul requires 2D tensors, got {}D and {}D",
                self.ndim(),
                other.ndim()
            )));
        }

        let (m, k) = (self.shape[0], self.shape[1]);
        let (k2, n) = (other.shape[0], other.shape[1]);
        if k != k2 {
            return Err(Error::shape_mismatch(&[m, k], &[k2, n]));
        }

        let a = self.to_vec();
        let b = other.to_vec();
        let mut c = vec![0.0; m * n];
        CpuBackend::matmul(&mut c, &a, &b, m, n, k);

        Self::from_vec(c, &[m, n])
    }
}

// =============================================================================
// Operator Overloads
// =============================================================================

impl core::ops::Add for &Tensor {
    type Output = Tensor;

    fn add(self, other: Self) -> Tensor {
        Tensor::add(self, other).expect("Addition failed")
    }
}

impl core::ops::Sub for &Tensor {
    type Output = Tensor;

    fn sub(self, other: Self) -> Tensor {
        Tensor::sub(self, other).expect("Subtraction failed")
    }
}

impl core::ops::Mul for &Tensor {
    type Output = Tensor;

    fn mul(self, other: Self) -> Tensor {
        Tensor::mul(self, other).expect("Multiplication failed")
    }
}

impl core::ops::Div for &Tensor {
    type Output = Tensor;

    fn div(self, other: Self) -> Tensor {
        Tensor::div(self, other).expect("Division failed")
    }
}

impl core::ops::Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        Tensor::neg(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.shape(), &[2, 2]);
        assert_eq!(t.numel(), 4);
        assert_eq!(t.ndim(), 2);
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        let result = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar() {
        let t = Tensor::scalar(42.0);
        assert!(t.is_scalar());
        assert_eq!(t.item().unwrap(), 42.0);
    }

    #[test]
    fn test_get_set() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.get(&[0, 1]).unwrap(), 2.0);
        assert_eq!(t.get(&[1, 0]).unwrap(), 3.0);

        t.set(&[1, 1], 99.0).unwrap();
        assert_eq!(t.get(&[1, 1]).unwrap(), 99.0);

        assert!(t.get(&[2, 0]).is_err());
    }

    #[test]
    fn test_reshape_shares_storage() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let r = t.reshape(&[3, 2]).unwrap();

        assert_eq!(r.shape(), &[3, 2]);
        t.set(&[0, 0], 9.0).unwrap();
        assert_eq!(r.get(&[0, 0]).unwrap(), 9.0);
    }

    #[test]
    fn test_reshape_infer() {
        let t = Tensor::from_vec(vec![0.0; 12], &[3, 4]).unwrap();
        let r = t.reshape(&[2, -1]).unwrap();
        assert_eq!(r.shape(), &[2, 6]);
    }

    #[test]
    fn test_flatten() {
        let t = Tensor::from_vec(vec![0.0; 12], &[3, 2, 2]).unwrap();
        assert_eq!(t.flatten().shape(), &[12]);
    }

    #[test]
    fn test_transpose() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let tt = t.t().unwrap();

        assert_eq!(tt.shape(), &[3, 2]);
        assert!(!tt.is_contiguous());
        assert_eq!(tt.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(tt.get(&[2, 1]).unwrap(), 6.0);
    }

    #[test]
    fn test_squeeze_unsqueeze() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap();
        let s = t.squeeze(None).unwrap();
        assert_eq!(s.shape(), &[3]);

        let u = s.unsqueeze(0).unwrap();
        assert_eq!(u.shape(), &[1, 3]);

        let u = s.unsqueeze(-1).unwrap();
        assert_eq!(u.shape(), &[3, 1]);
    }

    #[test]
    fn test_add_same_shape() {
        let a = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap();
        let c = a.add(&b).unwrap();
        assert_eq!(c.to_vec(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_add_broadcast() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b = Tensor::from_vec(vec![10.0, 20.0, 30.0], &[3]).unwrap();
        let c = a.add(&b).unwrap();

        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.to_vec(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_broadcast_incompatible() {
        let a = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_mul_div() {
        let a = Tensor::from_vec(vec![2.0, 6.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![4.0, 3.0], &[2]).unwrap();

        assert_eq!(a.mul(&b).unwrap().to_vec(), vec![8.0, 18.0]);
        assert_eq!(a.div(&b).unwrap().to_vec(), vec![0.5, 2.0]);
    }

    #[test]
    fn test_scalar_ops() {
        let a = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        assert_eq!(a.add_scalar(1.0).to_vec(), vec![2.0, 3.0]);
        assert_eq!(a.sub_scalar(1.0).to_vec(), vec![0.0, 1.0]);
        assert_eq!(a.mul_scalar(3.0).to_vec(), vec![3.0, 6.0]);
        assert_eq!(a.div_scalar(2.0).to_vec(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_matmul() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b = Tensor::from_vec(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], &[3, 2]).unwrap();
        let c = a.matmul(&b).unwrap();

        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_dim_mismatch() {
        let a = Tensor::from_vec(vec![0.0; 6], &[2, 3]).unwrap();
        let b = Tensor::from_vec(vec![0.0; 6], &[2, 3]).unwrap();
        assert!(a.matmul(&b).is_err());
    }

    #[test]
    fn test_reductions() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        assert_eq!(t.sum().item().unwrap(), 10.0);
        assert_eq!(t.mean().unwrap().item().unwrap(), 2.5);
        assert_eq!(t.max().unwrap().item().unwrap(), 4.0);
        assert_eq!(t.min().unwrap().item().unwrap(), 1.0);
        assert_eq!(t.argmax().unwrap(), 3);
    }

    #[test]
    fn test_relu() {
        let t = Tensor::from_vec(vec![-1.0, 0.0, 2.0], &[3]).unwrap();
        assert_eq!(t.relu().to_vec(), vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_pow() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        assert_eq!(t.pow(2.0).to_vec(), vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_fill_zero() {
        let t = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        t.fill_(7.0);
        assert_eq!(t.to_vec(), vec![7.0, 7.0]);
        t.zero_();
        assert_eq!(t.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_clone_deep_independent() {
        let t = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let d = t.clone_deep();
        t.fill_(5.0);
        assert_eq!(d.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_operators() {
        let a = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap();

        assert_eq!((&a + &b).to_vec(), vec![4.0, 6.0]);
        assert_eq!((&a - &b).to_vec(), vec![-2.0, -2.0]);
        assert_eq!((&a * &b).to_vec(), vec![3.0, 8.0]);
        assert_eq!((&b / &a).to_vec(), vec![3.0, 2.0]);
        assert_eq!((-&a).to_vec(), vec![-1.0, -2.0]);
    }
}
