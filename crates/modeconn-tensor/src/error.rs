//! Error Types for Tensor Operations
//!
//! Provides the shared error enum and `Result` alias used across the
//! modeconn workspace. All fallible tensor operations return these.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Error Enum
// =============================================================================

/// Errors that can occur during tensor operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Shapes of operands do not match.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape received.
        actual: Vec<usize>,
    },

    /// A dimension index is out of range for the tensor.
    #[error("Invalid dimension {index} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The offending dimension index.
        index: i64,
        /// Number of dimensions the tensor has.
        ndim: usize,
    },

    /// An element index is out of range.
    #[error("Index {index} out of bounds for size {size}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The size of the indexed extent.
        size: usize,
    },

    /// Two shapes cannot be broadcast together.
    #[error("Cannot broadcast shapes {shape1:?} and {shape2:?}")]
    BroadcastError {
        /// First shape.
        shape1: Vec<usize>,
        /// Second shape.
        shape2: Vec<usize>,
    },

    /// The requested operation is not valid for the given operands.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong.
        message: String,
    },

    /// The operation requires a non-empty tensor.
    #[error("Operation requires a non-empty tensor")]
    EmptyTensor,
}

// =============================================================================
// Constructor Helpers
// =============================================================================

impl Error {
    /// Creates a `ShapeMismatch` error from shape slices.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates an `InvalidOperation` error from a message.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = Error::shape_mismatch(&[2, 3], &[3, 2]);
        let msg = err.to_string();
        assert!(msg.contains("[2, 3]"));
        assert!(msg.contains("[3, 2]"));
    }

    #[test]
    fn test_invalid_operation_display() {
        let err = Error::invalid_operation("matmul requires 2D operands");
        assert!(err.to_string().contains("matmul requires 2D operands"));
    }
}
