//! Module Trait - Neural Network Module Interface
//!
//! Defines the core Module trait that all neural network layers implement.
//! This is the foundation of the neural network abstraction in modeconn.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use modeconn_autograd::Variable;

use crate::parameter::{Buffer, Parameter};

// =============================================================================
// Module Trait
// =============================================================================

/// Core trait for all neural network modules.
///
/// Every layer in modeconn implements this trait, which provides:
/// - Forward pass computation
/// - Parameter and buffer management
/// - Training/evaluation mode switching
/// - Module naming
pub trait Module: Send + Sync {
    /// Performs the forward pass.
    ///
    /// # Arguments
    /// * `input` - Input variable
    ///
    /// # Returns
    /// Output variable after applying this module's transformation.
    fn forward(&self, input: &Variable) -> Variable;

    /// Returns all parameters of this module.
    ///
    /// This includes parameters from all child modules. The ordering is
    /// stable across calls and mirrors construction order, which matters
    /// when zipping the parameters of two structurally identical models.
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }

    /// Returns named parameters of this module.
    fn named_parameters(&self) -> HashMap<String, Parameter> {
        HashMap::new()
    }

    /// Returns all buffers of this module.
    ///
    /// Buffers hold persistent non-learnable state, such as the running
    /// statistics of batch normalization. Ordering follows construction
    /// order, like `parameters`.
    fn buffers(&self) -> Vec<Buffer> {
        Vec::new()
    }

    /// Returns the number of trainable parameters.
    fn num_parameters(&self) -> usize {
        self.parameters()
            .iter()
            .filter(|p| p.requires_grad())
            .map(|p| p.numel())
            .sum()
    }

    /// Sets the module to training mode.
    fn train(&mut self) {
        self.set_training(true);
    }

    /// Sets the module to evaluation mode.
    fn eval(&mut self) {
        self.set_training(false);
    }

    /// Sets the training mode.
    fn set_training(&mut self, _training: bool) {
        // Default implementation does nothing
        // Submodules override this if they have training-specific behavior
    }

    /// Returns whether the module is in training mode.
    fn is_training(&self) -> bool {
        true // Default to training mode
    }

    /// Zeros all gradients of parameters.
    fn zero_grad(&self) {
        for param in self.parameters() {
            param.zero_grad();
        }
    }

    /// Returns the module name for debugging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// =============================================================================
// Tests
// =============================================================================
