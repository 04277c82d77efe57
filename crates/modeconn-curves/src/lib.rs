//! modeconn-curves - Weight-Space Curves Between Trained Models
//!
//! Implements the curve-finding side of mode connectivity: two trained
//! copies of a network become the endpoints of a parametric curve in weight
//! space, and the interior of the curve is trained so that every point on
//! it is itself a good set of weights.
//!
//! # Key Components
//!
//! - **Curve trait**: Maps a position t to per-bend blending coefficients
//! - **Bezier / PolyChain**: The two coefficient curve families
//! - **BendParameters**: One learnable tensor replicated across bends
//! - **Curve layers**: CurveLinear, CurveConv2d, CurveBatchNorm2d
//! - **CurveModel / CurveNet**: A whole architecture evaluated along a curve
//!
//! # Example
//!
//! ```ignore
//! use modeconn_curves::prelude::*;
//!
//! let fixed = fix_points(3, true, true);
//! let net = CurveNet::new(
//!     Box::new(Bezier::new(3)),
//!     Box::new(my_curve_model(10, &fixed)),
//! );
//!
//! // Seed the endpoints with two trained models, connect them linearly
//! net.import_base_parameters(&model_a, 0);
//! net.import_base_parameters(&model_b, 2);
//! net.init_linear();
//!
//! // Evaluate halfway between the two models
//! let logits = net.forward_t(&input, Some(0.5));
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

pub mod curve;
pub mod layers;
pub mod net;
pub mod params;

// =============================================================================
// Re-exports
// =============================================================================

pub use curve::{fix_points, Bezier, Curve, PolyChain};
pub use net::{l2_regularizer, CurveModel, CurveNet};
pub use params::BendParameters;

// Layer re-exports
pub use layers::{CurveBatchNorm2d, CurveConv2d, CurveLinear};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for working with weight-space curves.
pub mod prelude {
    pub use crate::{
        // Coefficient curves
        fix_points,
        l2_regularizer,
        BendParameters,
        Bezier,
        Curve,
        CurveBatchNorm2d,
        CurveConv2d,
        // Layers
        CurveLinear,
        // Model plumbing
        CurveModel,
        CurveNet,
        PolyChain,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_autograd::Variable;
    use modeconn_tensor::ones;

    #[test]
    fn test_curve_layer_with_bezier_coefficients() {
        let fixed = fix_points(3, true, true);
        let layer = CurveLinear::new(4, 2, &fixed);
        let bezier = Bezier::new(3);

        let input = Variable::new(ones(&[2, 4]), false);
        let output = layer.forward_t(&input, &bezier.coefficients(0.3));
        assert_eq!(output.shape(), vec![2, 2]);
    }

    #[test]
    fn test_fixed_endpoints_trainable_interior() {
        let fixed = fix_points(3, true, true);
        let layer = CurveConv2d::new(1, 2, 3, &fixed);

        let trainable: Vec<bool> = layer.parameters().iter().map(|p| p.requires_grad()).collect();
        // weight_0..2 then bias_0..2
        assert_eq!(trainable, vec![false, true, false, false, true, false]);
    }

    #[test]
    fn test_curve_families_agree_at_endpoints() {
        let fixed = fix_points(3, true, true);
        let layer = CurveLinear::new(3, 3, &fixed);
        let bezier = Bezier::new(3);
        let chain = PolyChain::new(3);

        let input = Variable::new(ones(&[1, 3]), false);
        let from_bezier = layer.forward_t(&input, &bezier.coefficients(0.0));
        let from_chain = layer.forward_t(&input, &chain.coefficients(0.0));
        assert_eq!(
            from_bezier.data().to_vec(),
            from_chain.data().to_vec()
        );
    }
}
