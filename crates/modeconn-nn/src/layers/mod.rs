//! Neural Network Layers
//!
//! Contains the layer implementations used by the architectures in this
//! workspace.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod conv;
pub mod dropout;
pub mod linear;
pub mod norm;
pub mod pooling;

// Re-exports
pub use conv::Conv2d;
pub use dropout::Dropout;
pub use linear::Linear;
pub use norm::{BatchNorm2d, InstanceNorm1d};
pub use pooling::MaxPool2d;
