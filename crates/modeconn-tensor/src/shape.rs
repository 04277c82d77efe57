//! Shape and Stride Utilities
//!
//! Provides shape/stride types and the index arithmetic used by tensor
//! views: contiguity checks, broadcasting, reshape with `-1` inference,
//! and dimension normalization.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Tensor shape: extent of each dimension.
///
/// Inline storage covers tensors up to 6 dimensions without allocation.
pub type Shape = SmallVec<[usize; 6]>;

/// Tensor strides: element step per dimension, in elements (not bytes).
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Basic Shape Math
// =============================================================================

/// Returns the total number of elements for a shape.
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes row-major (C-order) contiguous strides for a shape.
#[must_use]
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    let mut strides = Strides::with_capacity(shape.len());
    let mut stride = 1isize;

    for &dim in shape.iter().rev() {
        strides.push(stride);
        stride *= dim as isize;
    }

    strides.reverse();
    strides
}

/// Returns true if the given strides are row-major contiguous for the shape.
#[must_use]
pub fn is_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    strides == contiguous_strides(shape).as_slice()
}

/// Converts multi-dimensional indices to a linear offset using strides.
#[must_use]
pub fn linear_index(indices: &[usize], strides: &[isize]) -> isize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&i, &s)| i as isize * s)
        .sum()
}

/// Converts a linear index into multi-dimensional indices for a shape.
#[must_use]
pub fn unravel_index(mut index: usize, shape: &[usize]) -> Shape {
    let mut indices = Shape::with_capacity(shape.len());
    indices.resize(shape.len(), 0);

    for (i, &dim) in shape.iter().enumerate().rev() {
        indices[i] = index % dim;
        index /= dim;
    }

    indices
}

/// Validates that indices are in bounds for a shape.
pub fn validate_indices(indices: &[usize], shape: &[usize]) -> Result<()> {
    if indices.len() != shape.len() {
        return Err(Error::shape_mismatch(shape, indices));
    }

    for (&index, &size) in indices.iter().zip(shape.iter()) {
        if index >= size {
            return Err(Error::IndexOutOfBounds { index, size });
        }
    }

    Ok(())
}

/// Normalizes a possibly-negative dimension index.
///
/// Negative values count from the end, as in `-1` for the last dimension.
pub fn normalize_dim(dim: i64, ndim: usize) -> Result<usize> {
    let normalized = if dim < 0 { dim + ndim as i64 } else { dim };

    if normalized < 0 || normalized >= ndim as i64 {
        return Err(Error::InvalidDimension { index: dim, ndim });
    }

    Ok(normalized as usize)
}

// =============================================================================
// Broadcasting
// =============================================================================

/// Computes the broadcast shape of two shapes using NumPy rules.
///
/// Dimensions are aligned from the right; each pair must be equal or one
/// of them must be 1.
pub fn broadcast_shape(shape1: &[usize], shape2: &[usize]) -> Result<Shape> {
    let ndim = shape1.len().max(shape2.len());
    let mut result = Shape::with_capacity(ndim);
    result.resize(ndim, 0);

    for i in 0..ndim {
        let d1 = if i < shape1.len() {
            shape1[shape1.len() - 1 - i]
        } else {
            1
        };
        let d2 = if i < shape2.len() {
            shape2[shape2.len() - 1 - i]
        } else {
            1
        };

        if d1 != d2 && d1 != 1 && d2 != 1 {
            return Err(Error::BroadcastError {
                shape1: shape1.to_vec(),
                shape2: shape2.to_vec(),
            });
        }

        result[ndim - 1 - i] = d1.max(d2);
    }

    Ok(result)
}

/// Returns true if two shapes can be broadcast together.
#[must_use]
pub fn can_broadcast(shape1: &[usize], shape2: &[usize]) -> bool {
    broadcast_shape(shape1, shape2).is_ok()
}

/// Computes strides for reading a tensor as if broadcast to `target_shape`.
///
/// Broadcast dimensions get stride 0 so the same element is read for every
/// index along them.
#[must_use]
pub fn broadcast_strides(shape: &[usize], strides: &[isize], target_shape: &[usize]) -> Strides {
    let ndim = target_shape.len();
    let mut result = Strides::with_capacity(ndim);
    result.resize(ndim, 0);

    let offset = ndim - shape.len();
    for i in 0..shape.len() {
        if shape[i] == target_shape[offset + i] {
            result[offset + i] = strides[i];
        } else {
            result[offset + i] = 0;
        }
    }

    result
}

// =============================================================================
// Shape Transformations
// =============================================================================

/// Computes a reshaped shape, supporting a single `-1` inferred dimension.
pub fn reshape(old_shape: &[usize], new_shape: &[isize]) -> Result<Shape> {
    let old_numel = numel(old_shape);

    let mut inferred = None;
    let mut known_numel = 1usize;

    for (i, &dim) in new_shape.iter().enumerate() {
        if dim == -1 {
            if inferred.is_some() {
                return Err(Error::invalid_operation(
                    "Only one dimension can be inferred (-1) in reshape",
                ));
            }
            inferred = Some(i);
        } else if dim < 0 {
            return Err(Error::invalid_operation(format!(
                "Invalid dimension {dim} in reshape"
            )));
        } else {
            known_numel *= dim as usize;
        }
    }

    let mut result: Shape = new_shape.iter().map(|&d| d.max(0) as usize).collect();

    if let Some(i) = inferred {
        if known_numel == 0 || old_numel % known_numel != 0 {
            return Err(Error::invalid_operation(format!(
                "Cannot infer dimension: {old_numel} elements do not divide into {new_shape:?}"
            )));
        }
        result[i] = old_numel / known_numel;
    } else if known_numel != old_numel {
        return Err(Error::shape_mismatch(old_shape, result.as_slice()));
    }

    Ok(result)
}

/// Removes a size-1 dimension, or all size-1 dimensions when `dim` is None.
pub fn squeeze(shape: &[usize], dim: Option<usize>) -> Result<Shape> {
    match dim {
        Some(d) => {
            if d >= shape.len() {
                return Err(Error::InvalidDimension {
                    index: d as i64,
                    ndim: shape.len(),
                });
            }
            if shape[d] != 1 {
                return Err(Error::invalid_operation(format!(
                    "Cannot squeeze dimension {d} of size {}",
                    shape[d]
                )));
            }
            Ok(shape
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != d)
                .map(|(_, &s)| s)
                .collect())
        }
        None => {
            let result: Shape = shape.iter().copied().filter(|&s| s != 1).collect();
            Ok(result)
        }
    }
}

/// Inserts a size-1 dimension at the given position.
pub fn unsqueeze(shape: &[usize], dim: usize) -> Result<Shape> {
    if dim > shape.len() {
        return Err(Error::InvalidDimension {
            index: dim as i64,
            ndim: shape.len(),
        });
    }

    let mut result = Shape::with_capacity(shape.len() + 1);
    result.extend_from_slice(&shape[..dim]);
    result.push(1);
    result.extend_from_slice(&shape[dim..]);
    Ok(result)
}

/// Swaps two dimensions of a shape.
pub fn transpose_shape(shape: &[usize], dim0: usize, dim1: usize) -> Result<Shape> {
    if dim0 >= shape.len() || dim1 >= shape.len() {
        return Err(Error::InvalidDimension {
            index: dim0.max(dim1) as i64,
            ndim: shape.len(),
        });
    }

    let mut result: Shape = shape.iter().copied().collect();
    result.swap(dim0, dim1);
    Ok(result)
}

/// Swaps two dimensions of a stride list.
#[must_use]
pub fn transpose_strides(strides: &[isize], dim0: usize, dim1: usize) -> Strides {
    let mut result: Strides = strides.iter().copied().collect();
    result.swap(dim0, dim1);
    result
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[2, 3, 4]), 24);
        assert_eq!(numel(&[]), 1);
        assert_eq!(numel(&[0, 5]), 0);
    }

    #[test]
    fn test_contiguous_strides() {
        let strides = contiguous_strides(&[2, 3, 4]);
        assert_eq!(strides.as_slice(), &[12, 4, 1]);

        let strides = contiguous_strides(&[5]);
        assert_eq!(strides.as_slice(), &[1]);
    }

    #[test]
    fn test_is_contiguous() {
        assert!(is_contiguous(&[2, 3], &[3, 1]));
        assert!(!is_contiguous(&[2, 3], &[1, 2]));
    }

    #[test]
    fn test_linear_index() {
        let strides: Strides = smallvec![12, 4, 1];
        assert_eq!(linear_index(&[1, 2, 3], &strides), 23);
        assert_eq!(linear_index(&[0, 0, 0], &strides), 0);
    }

    #[test]
    fn test_unravel_index() {
        let indices = unravel_index(23, &[2, 3, 4]);
        assert_eq!(indices.as_slice(), &[1, 2, 3]);

        let indices = unravel_index(0, &[2, 3, 4]);
        assert_eq!(indices.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_normalize_dim() {
        assert_eq!(normalize_dim(0, 3).unwrap(), 0);
        assert_eq!(normalize_dim(-1, 3).unwrap(), 2);
        assert_eq!(normalize_dim(-3, 3).unwrap(), 0);
        assert!(normalize_dim(3, 3).is_err());
        assert!(normalize_dim(-4, 3).is_err());
    }

    #[test]
    fn test_broadcast_shape() {
        let result = broadcast_shape(&[2, 3], &[3]).unwrap();
        assert_eq!(result.as_slice(), &[2, 3]);

        let result = broadcast_shape(&[4, 1, 3], &[2, 1]).unwrap();
        assert_eq!(result.as_slice(), &[4, 2, 3]);

        assert!(broadcast_shape(&[2, 3], &[4]).is_err());
    }

    #[test]
    fn test_broadcast_strides() {
        let strides = broadcast_strides(&[3], &[1], &[2, 3]);
        assert_eq!(strides.as_slice(), &[0, 1]);

        let strides = broadcast_strides(&[2, 1], &[1, 1], &[2, 3]);
        assert_eq!(strides.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_reshape() {
        let result = reshape(&[2, 6], &[3, 4]).unwrap();
        assert_eq!(result.as_slice(), &[3, 4]);

        let result = reshape(&[2, 6], &[-1]).unwrap();
        assert_eq!(result.as_slice(), &[12]);

        let result = reshape(&[2, 6], &[4, -1]).unwrap();
        assert_eq!(result.as_slice(), &[4, 3]);

        assert!(reshape(&[2, 6], &[5, -1]).is_err());
        assert!(reshape(&[2, 6], &[-1, -1]).is_err());
        assert!(reshape(&[2, 6], &[3, 5]).is_err());
    }

    #[test]
    fn test_squeeze_unsqueeze() {
        let result = squeeze(&[1, 3, 1, 2], None).unwrap();
        assert_eq!(result.as_slice(), &[3, 2]);

        let result = squeeze(&[1, 3], Some(0)).unwrap();
        assert_eq!(result.as_slice(), &[3]);
        assert!(squeeze(&[2, 3], Some(0)).is_err());

        let result = unsqueeze(&[3, 2], 1).unwrap();
        assert_eq!(result.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn test_transpose_shape() {
        let result = transpose_shape(&[2, 3, 4], 0, 2).unwrap();
        assert_eq!(result.as_slice(), &[4, 3, 2]);

        let strides = transpose_strides(&[12, 4, 1], 0, 2);
        assert_eq!(strides.as_slice(), &[1, 4, 12]);
    }
}
