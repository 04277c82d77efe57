//! Curve Layers - Layers with Per-Bend Weight Copies
//!
//! Curve counterparts of the ordinary layers. Each stores its learnable
//! tensors once per bend and takes the curve coefficients as a forward
//! argument.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod conv;
pub mod linear;
pub mod norm;

pub use conv::CurveConv2d;
pub use linear::CurveLinear;
pub use norm::CurveBatchNorm2d;
