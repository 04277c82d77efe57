//! BendParameters - Per-Bend Weight Storage for Curve Layers
//!
//! Each learnable tensor of a curve layer exists once per bend point. A
//! `BendParameters` group owns those copies, names them `{base}_{index}`,
//! freezes the bends marked as fixed, and blends them into a single tensor
//! given the curve coefficients for some position `t`.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_autograd::Variable;
use modeconn_nn::Parameter;
use modeconn_tensor::{zeros, Tensor};

// =============================================================================
// BendParameters
// =============================================================================

/// One learnable tensor replicated across the bend points of a curve.
///
/// Bend `i` is a `Parameter` named `{base}_{i}` with `requires_grad` set to
/// the inverse of its fixed flag. Endpoint bends are typically fixed and hold
/// imported weights; interior bends are trained.
pub struct BendParameters {
    bends: Vec<Parameter>,
}

impl BendParameters {
    /// Creates a zero-initialized group with one bend per fixed flag.
    ///
    /// Layers overwrite the zeros in their own `reset_parameters`.
    ///
    /// # Panics
    ///
    /// Panics if `fixed` has fewer than two entries.
    pub fn new(base_name: &str, shape: &[usize], fixed: &[bool]) -> Self {
        assert!(fixed.len() >= 2, "A curve needs at least two bends");
        let bends = fixed
            .iter()
            .enumerate()
            .map(|(i, &is_fixed)| {
                Parameter::named(format!("{base_name}_{i}"), zeros(shape), !is_fixed)
            })
            .collect();
        Self { bends }
    }

    /// Number of bends in the group.
    pub fn num_bends(&self) -> usize {
        self.bends.len()
    }

    /// Shape shared by every bend.
    pub fn shape(&self) -> Vec<usize> {
        self.bends[0].shape()
    }

    /// Number of elements in a single bend.
    pub fn numel(&self) -> usize {
        self.bends[0].numel()
    }

    /// Returns the parameter for one bend.
    pub fn bend(&self, index: usize) -> &Parameter {
        &self.bends[index]
    }

    /// Returns shared handles to all bends, in bend order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.bends.clone()
    }

    /// Reinitializes every bend with a tensor drawn from `f`.
    pub fn reset_with<F>(&self, mut f: F)
    where
        F: FnMut() -> Tensor,
    {
        for bend in &self.bends {
            bend.update_data(f());
        }
    }

    /// Blends the bends into a plain tensor: sum of `coeffs[i] * bend_i`.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` does not have one entry per bend.
    pub fn blend(&self, coeffs: &[f32]) -> Tensor {
        self.check_coefficients(coeffs);
        let mut blended = self.bends[0].data().mul_scalar(coeffs[0]);
        for (bend, &coeff) in self.bends.iter().zip(coeffs.iter()).skip(1) {
            blended = blended.add(&bend.data().mul_scalar(coeff)).unwrap();
        }
        blended
    }

    /// Blends the bends into a variable attached to the autograd graph.
    ///
    /// Gradients of the result flow back into every non-fixed bend, scaled
    /// by that bend's coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` does not have one entry per bend.
    pub fn blend_var(&self, coeffs: &[f32]) -> Variable {
        self.check_coefficients(coeffs);
        let mut blended = self.bends[0].variable().mul_scalar(coeffs[0]);
        for (bend, &coeff) in self.bends.iter().zip(coeffs.iter()).skip(1) {
            blended = blended.add_var(&bend.variable().mul_scalar(coeff));
        }
        blended
    }

    fn check_coefficients(&self, coeffs: &[f32]) {
        assert_eq!(
            coeffs.len(),
            self.bends.len(),
            "Expected {} curve coefficients, got {}",
            self.bends.len(),
            coeffs.len()
        );
    }
}

impl std::fmt::Debug for BendParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BendParameters")
            .field("num_bends", &self.bends.len())
            .field("shape", &self.shape())
            .finish()
    }
}

/// Sum of squared elements of a tensor.
pub fn squared_norm(tensor: &Tensor) -> f32 {
    tensor.to_vec().iter().map(|x| x * x).sum()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modeconn_tensor::ones;

    #[test]
    fn test_bend_naming_and_flags() {
        let group = BendParameters::new("weight", &[2, 2], &[true, false, true]);
        assert_eq!(group.num_bends(), 3);
        assert_eq!(group.shape(), vec![2, 2]);
        assert_eq!(group.bend(0).name(), "weight_0");
        assert_eq!(group.bend(1).name(), "weight_1");
        assert_eq!(group.bend(2).name(), "weight_2");
        assert!(!group.bend(0).requires_grad());
        assert!(group.bend(1).requires_grad());
        assert!(!group.bend(2).requires_grad());
    }

    #[test]
    fn test_blend_selects_endpoints() {
        let group = BendParameters::new("weight", &[2], &[false, false]);
        group.bend(0).update_data(Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap());
        group.bend(1).update_data(Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap());

        assert_eq!(group.blend(&[1.0, 0.0]).to_vec(), vec![1.0, 2.0]);
        assert_eq!(group.blend(&[0.0, 1.0]).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_blend_midpoint() {
        let group = BendParameters::new("weight", &[2], &[false, false]);
        group.bend(0).update_data(Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap());
        group.bend(1).update_data(Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap());

        assert_eq!(group.blend(&[0.5, 0.5]).to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_blend_var_gradient_scales_with_coefficient() {
        let group = BendParameters::new("weight", &[2], &[true, false]);
        group.reset_with(|| ones(&[2]));

        let blended = group.blend_var(&[0.25, 0.75]);
        let loss = blended.sum();
        loss.backward();

        // The fixed bend stays grad-free, the trainable bend sees its coefficient
        assert!(group.bend(0).grad().is_none());
        let grad = group.bend(1).grad().unwrap();
        assert_eq!(grad.to_vec(), vec![0.75, 0.75]);
    }

    #[test]
    fn test_reset_with() {
        let group = BendParameters::new("bias", &[3], &[false, false]);
        group.reset_with(|| ones(&[3]));
        assert_eq!(group.bend(0).data().to_vec(), vec![1.0, 1.0, 1.0]);
        assert_eq!(group.bend(1).data().to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_squared_norm() {
        let t = Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap();
        assert!((squared_norm(&t) - 25.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "curve coefficients")]
    fn test_blend_rejects_wrong_coefficient_count() {
        let group = BendParameters::new("weight", &[2], &[false, false]);
        let _ = group.blend(&[1.0]);
    }
}
