//! modeconn-nn - Neural Network Module Library
//!
//! Provides the neural network layers, weight initialization, and module
//! abstractions used to build models in modeconn.
//!
//! # Key Components
//!
//! - **Module trait**: Core interface for all neural network modules
//! - **Parameter / Buffer**: Shared handles for learnable and persistent state
//! - **Layers**: Linear, Conv2d, BatchNorm2d, InstanceNorm1d, MaxPool2d, Dropout
//! - **Activations**: ReLU
//! - **Initialization**: Kaiming, Xavier, normal, uniform
//! - **Functional API**: Stateless operations taking weights as arguments
//!
//! # Example
//!
//! ```ignore
//! use modeconn_nn::prelude::*;
//!
//! let conv = Conv2d::with_options(3, 16, (3, 3), (1, 1), (1, 1), true);
//! let pool = MaxPool2d::new(2);
//! let fc = Linear::new(16 * 16 * 16, 10);
//!
//! // Forward pass
//! let x = conv.forward(&input).relu();
//! let x = pool.forward(&x);
//! let logits = fc.forward(&x.reshape(&[batch, 16 * 16 * 16]));
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::ptr_arg)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_same_then_else)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unused_self)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::single_match_else)]
#![allow(clippy::fn_params_excessive_bools)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::format_push_string)]
#![allow(clippy::erasing_op)]
#![allow(clippy::type_repetition_in_bounds)]
#![allow(clippy::iter_without_into_iter)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::use_debug)]
#![allow(clippy::case_sensitive_file_extension_comparisons)]
#![allow(clippy::large_enum_variant)]
#![allow(clippy::panic)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::assigning_clones)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::explicit_iter_loop)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::only_used_in_recursion)]
#![allow(clippy::manual_clamp)]
#![allow(clippy::ref_option)]
#![allow(clippy::multiple_bound_locations)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::manual_assert)]
#![allow(clippy::unnecessary_debug_formatting)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activation;
pub mod functional;
pub mod init;
pub mod layers;
pub mod module;
pub mod parameter;

// =============================================================================
// Re-exports
// =============================================================================

pub use module::Module;
pub use parameter::{Buffer, Parameter};

// Layer re-exports
pub use layers::{BatchNorm2d, Conv2d, Dropout, InstanceNorm1d, Linear, MaxPool2d};

// Activation re-exports
pub use activation::ReLU;

// Init re-exports
pub use init::{
    constant, kaiming_normal, kaiming_uniform, normal, ones, randn, uniform_range, xavier_normal,
    xavier_uniform, zeros,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for neural network development.
pub mod prelude {
    pub use crate::{
        // Functional
        functional,
        BatchNorm2d,
        // Core traits and types
        Buffer,
        Conv2d,
        Dropout,
        InstanceNorm1d,
        // Layers
        Linear,
        MaxPool2d,
        Module,
        Parameter,
        // Activations
        ReLU,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_autograd::Variable;
    use modeconn_tensor::Tensor;

    #[test]
    fn test_conv_relu_pool_stack() {
        let conv = Conv2d::new(1, 16, 3);
        let pool = MaxPool2d::new(2);

        let input = Variable::new(
            Tensor::from_vec(vec![1.0; 784], &[1, 1, 28, 28]).unwrap(),
            false,
        );
        let x = conv.forward(&input).relu();
        let output = pool.forward(&x);
        // Conv2d: 28 -> 26, MaxPool2d: 26 -> 13
        assert_eq!(output.shape(), vec![1, 16, 13, 13]);
    }

    #[test]
    fn test_mlp_stack() {
        let fc1 = Linear::new(10, 5);
        let fc2 = Linear::new(5, 2);

        let input = Variable::new(Tensor::from_vec(vec![1.0; 20], &[2, 10]).unwrap(), false);
        let output = fc2.forward(&fc1.forward(&input).relu());
        assert_eq!(output.shape(), vec![2, 2]);
        assert_eq!(fc1.parameters().len() + fc2.parameters().len(), 4);
    }

    #[test]
    fn test_batchnorm_train_eval_cycle() {
        let mut bn = BatchNorm2d::new(3);
        assert!(bn.is_training());
        bn.eval();
        assert!(!bn.is_training());
        bn.train();
        assert!(bn.is_training());
    }
}
