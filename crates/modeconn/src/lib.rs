//! # Modeconn - Mode Connectivity of Neural Network Loss Surfaces
//!
//! Modeconn implements the curve-finding construction from "Loss Surfaces,
//! Mode Connectivity, and Fast Ensembling of DNNs": two independently
//! trained copies of a network become the endpoints of a parametric curve
//! in weight space, and the interior of the curve is trained so that every
//! point along it is itself a good set of weights.
//!
//! ## Core Features
//!
//! - **Tensors**: N-dimensional arrays with broadcasting and BLAS-backed matmul
//! - **Autograd**: Automatic differentiation with a computational graph
//! - **Neural Networks**: Layers, initialization, and module plumbing
//! - **Curves**: Bezier and polygonal chain parametrizations of weight space
//! - **Vision**: VGG16/VGG19 classifiers and their curve-parametrized twins
//!
//! # Quick Start
//!
//! ```ignore
//! use modeconn::prelude::*;
//!
//! // Two independently trained models with the same architecture
//! let model_a = VggBase::with_options(10, 16, true, 4, 0.5, false);
//! let model_b = VggBase::with_options(10, 16, true, 4, 0.5, false);
//!
//! // A three-bend Bezier curve between them
//! let fixed = fix_points(3, true, true);
//! let net = CurveNet::new(
//!     Box::new(Bezier::new(3)),
//!     Box::new(VGG16BN.curve(10, &fixed, 4)),
//! );
//!
//! net.import_base_parameters(&model_a, 0);
//! net.import_base_parameters(&model_b, 2);
//! net.init_linear();
//!
//! // Evaluate the network halfway along the curve
//! let output = net.forward_t(&input, Some(0.5));
//! ```
//!
//! # Reference
//! <https://arxiv.org/abs/1802.10026>
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
// Core Re-exports
// =============================================================================

pub use modeconn_tensor as tensor;

pub use modeconn_autograd as autograd;

// =============================================================================
// Neural Network Re-exports
// =============================================================================

pub use modeconn_nn as nn;

// =============================================================================
// Domain-Specific Re-exports
// =============================================================================

pub use modeconn_curves as curves;

pub use modeconn_vision as vision;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mode connectivity experiments.
///
/// This module re-exports the most commonly used types and traits from all
/// modeconn subcrates, allowing you to get started quickly with:
///
/// ```ignore
/// use modeconn::prelude::*;
/// ```
pub mod prelude {
    // Tensor operations
    pub use modeconn_tensor::Tensor;

    // Autograd
    pub use modeconn_autograd::{no_grad, Variable};

    // Neural network modules
    pub use modeconn_nn::{
        BatchNorm2d, Conv2d, Dropout, InstanceNorm1d, Linear, MaxPool2d, Module, Parameter, ReLU,
    };

    // Weight-space curves
    pub use modeconn_curves::{
        fix_points, l2_regularizer, BendParameters, Bezier, Curve, CurveModel, CurveNet, PolyChain,
    };

    // Vision models
    pub use modeconn_vision::{
        vgg16_compute_k, vgg16_size, VggBase, VggCurve, VGG16, VGG16BN, VGG19, VGG19BN,
    };
}

// =============================================================================
// Version Information
// =============================================================================

/// Returns the version of the modeconn framework.
#[must_use] pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// Tests
// =============================================================================
