//! modeconn-vision - VGG Models for Mode Connectivity
//!
//! Provides the VGG architectures used to study mode connectivity: the plain
//! classifiers and their curve-parametrized twins, structurally matched so
//! that trained plain models can seed the endpoints of a weight-space curve.
//!
//! # Key Components
//!
//! - **VggBase**: Feed-forward VGG classifier with a width multiplier
//! - **VggCurve**: The same network with one weight set per curve bend
//! - **VggArchitecture**: Descriptors for the VGG16/VGG19 variants
//! - **Sizing helpers**: Closed-form parameter counts and their inverse
//!
//! # Example
//!
//! ```ignore
//! use modeconn_curves::prelude::*;
//! use modeconn_vision::prelude::*;
//!
//! // A three-bend Bezier curve between two trained VGG16 models
//! let fixed = fix_points(3, true, true);
//! let net = CurveNet::new(
//!     Box::new(Bezier::new(3)),
//!     Box::new(VGG16.curve(10, &fixed, 64)),
//! );
//! net.import_base_parameters(&model_a, 0);
//! net.import_base_parameters(&model_b, 2);
//! net.init_linear();
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

pub mod models;

// =============================================================================
// Re-exports
// =============================================================================

pub use models::{
    vgg16_compute_k, vgg16_size, vgg_stages, VggArchitecture, VggBase, VggClassifier, VggCurve,
    VggFeatures, VGG16, VGG16BN, VGG19, VGG19BN,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for building VGG models.
pub mod prelude {
    pub use crate::{
        vgg16_compute_k,
        vgg16_size,
        vgg_stages,
        // Variant descriptors
        VggArchitecture,
        VggBase,
        VggCurve,
        VGG16,
        VGG16BN,
        VGG19,
        VGG19BN,
    };
}

// =============================================================================
// Tests
// =============================================================================
