//! Parameter - Learnable and Persistent Module State
//!
//! A Parameter is a Variable that is registered as a learnable value of a
//! module. A Buffer is the non-learnable companion: persistent state such
//! as batch-norm running statistics that is updated outside of gradient
//! descent. Both are shared handles, so cloning one and updating the clone
//! updates the original as well.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::Arc;

use modeconn_autograd::Variable;
use modeconn_tensor::Tensor;
use parking_lot::RwLock;

// =============================================================================
// Parameter
// =============================================================================

/// A learnable parameter of a module.
///
/// Wraps a `Variable` with `requires_grad = true` by default and gives it a
/// name for lookup in `named_parameters`.
#[derive(Clone)]
pub struct Parameter {
    /// The underlying variable (shared).
    data: Arc<RwLock<Variable>>,
    /// Parameter name for debugging and serialization.
    name: String,
}

impl Parameter {
    /// Creates a new parameter from a tensor.
    pub fn new(data: Tensor, requires_grad: bool) -> Self {
        Self {
            data: Arc::new(RwLock::new(Variable::new(data, requires_grad))),
            name: String::new(),
        }
    }

    /// Creates a named parameter.
    pub fn named(name: impl Into<String>, data: Tensor, requires_grad: bool) -> Self {
        Self {
            data: Arc::new(RwLock::new(Variable::new(data, requires_grad))),
            name: name.into(),
        }
    }

    /// Creates a parameter from an existing variable.
    pub fn from_variable(variable: Variable) -> Self {
        Self {
            data: Arc::new(RwLock::new(variable)),
            name: String::new(),
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the parameter name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns a clone of the underlying variable.
    ///
    /// The clone shares data and gradient storage with this parameter, so
    /// operations recorded through it reach the parameter's gradient.
    pub fn variable(&self) -> Variable {
        self.data.read().clone()
    }

    /// Returns a copy of the underlying tensor data.
    pub fn data(&self) -> Tensor {
        self.data.read().data()
    }

    /// Returns the shape of the parameter.
    pub fn shape(&self) -> Vec<usize> {
        self.data.read().shape()
    }

    /// Returns the number of elements.
    pub fn numel(&self) -> usize {
        self.data.read().numel()
    }

    /// Returns whether this parameter requires gradients.
    pub fn requires_grad(&self) -> bool {
        self.data.read().requires_grad()
    }

    /// Returns the current gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.data.read().grad()
    }

    /// Clears the gradient.
    pub fn zero_grad(&self) {
        self.data.read().zero_grad();
    }

    /// Replaces the parameter data, preserving the `requires_grad` flag.
    pub fn update_data(&self, new_data: Tensor) {
        let mut guard = self.data.write();
        let requires_grad = guard.requires_grad();
        *guard = Variable::new(new_data, requires_grad);
    }

    /// Applies an update function to the parameter data.
    pub fn apply_update<F>(&self, f: F)
    where
        F: FnOnce(&Tensor) -> Tensor,
    {
        let current = self.data();
        let updated = f(&current);
        self.update_data(updated);
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .field("requires_grad", &self.requires_grad())
            .finish()
    }
}

// =============================================================================
// Buffer
// =============================================================================

/// Non-learnable persistent state of a module.
///
/// Running statistics of normalization layers live in buffers: they are part
/// of the module's state and are copied when transplanting a model, but no
/// gradients flow into them. Buffers are shared handles like parameters.
#[derive(Clone)]
pub struct Buffer {
    /// The underlying tensor (shared).
    data: Arc<RwLock<Tensor>>,
    /// Buffer name for debugging.
    name: String,
}

impl Buffer {
    /// Creates a new buffer from a tensor.
    pub fn new(data: Tensor) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            name: String::new(),
        }
    }

    /// Creates a named buffer.
    pub fn named(name: impl Into<String>, data: Tensor) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            name: name.into(),
        }
    }

    /// Returns the buffer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the buffer contents.
    pub fn data(&self) -> Tensor {
        self.data.read().clone()
    }

    /// Returns the shape of the buffer.
    pub fn shape(&self) -> Vec<usize> {
        self.data.read().shape().to_vec()
    }

    /// Replaces the buffer contents.
    pub fn set_data(&self, data: Tensor) {
        *self.data.write() = data;
    }

    /// Copies the contents of another buffer into this one.
    pub fn copy_from(&self, other: &Buffer) {
        self.set_data(other.data());
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_tensor::zeros;

    #[test]
    fn test_parameter_creation() {
        let p = Parameter::new(zeros(&[3, 4]), true);
        assert_eq!(p.shape(), vec![3, 4]);
        assert_eq!(p.numel(), 12);
        assert!(p.requires_grad());
    }

    #[test]
    fn test_named_parameter() {
        let p = Parameter::named("weight", zeros(&[2, 2]), true);
        assert_eq!(p.name(), "weight");
    }

    #[test]
    fn test_update_data() {
        let p = Parameter::new(zeros(&[2]), true);
        p.update_data(Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap());
        assert_eq!(p.data().to_vec(), vec![1.0, 2.0]);
        assert!(p.requires_grad());
    }

    #[test]
    fn test_update_preserves_frozen_flag() {
        let p = Parameter::new(zeros(&[2]), false);
        p.update_data(Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap());
        assert!(!p.requires_grad());
    }

    #[test]
    fn test_apply_update() {
        let p = Parameter::new(Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap(), true);
        p.apply_update(|t| t.mul_scalar(2.0));
        assert_eq!(p.data().to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_shared_handle() {
        let p = Parameter::new(zeros(&[2]), true);
        let q = p.clone();
        q.update_data(Tensor::from_vec(vec![5.0, 6.0], &[2]).unwrap());
        assert_eq!(p.data().to_vec(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_buffer_copy_from() {
        let a = Buffer::named("running_mean", zeros(&[3]));
        let b = Buffer::new(Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap());
        a.copy_from(&b);
        assert_eq!(a.data().to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(a.name(), "running_mean");
    }

    #[test]
    fn test_buffer_shared_handle() {
        let a = Buffer::new(zeros(&[2]));
        let b = a.clone();
        b.set_data(Tensor::from_vec(vec![9.0, 9.0], &[2]).unwrap());
        assert_eq!(a.data().to_vec(), vec![9.0, 9.0]);
    }
}
