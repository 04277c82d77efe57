//! Differentiable Functions - Gradient Implementations
//!
//! Contains implementations of gradient functions for all differentiable
//! operations. Each struct implements `GradientFunction` to compute gradients
//! during the backward pass.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

mod activation;
mod basic;
mod linalg;

pub use activation::*;
pub use basic::*;
pub use linalg::*;
