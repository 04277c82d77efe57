//! Vision Models
//!
//! Provides the VGG model family in plain and curve-parametrized form.
//!
//! # Available Models
//!
//! - **VggBase**: Ordinary feed-forward VGG classifier (depths 16 and 19)
//! - **VggCurve**: Curve-parametrized twin with one weight set per bend
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod vgg;

pub use vgg::{
    vgg16_compute_k, vgg16_size, vgg_stages, VggArchitecture, VggBase, VggClassifier, VggCurve,
    VggFeatures, VGG16, VGG16BN, VGG19, VGG19BN,
};
