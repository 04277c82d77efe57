//! CurveNet - A Network Evaluated Along a Weight-Space Curve
//!
//! Pairs a coefficient curve with a model whose layers carry per-bend
//! weights. The endpoints of the curve are meant to hold two independently
//! trained copies of the same architecture; evaluating at interior positions
//! probes the loss surface between them.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use modeconn_autograd::Variable;
use modeconn_nn::{Buffer, Module, Parameter};
use modeconn_tensor::Tensor;
use rand::Rng;

use crate::curve::Curve;

// =============================================================================
// CurveModel Trait
// =============================================================================

/// A model whose learnable layers carry one weight copy per bend.
///
/// Implementations mirror a plain architecture layer for layer, so the
/// parameter and buffer orderings of the two line up and weights can be
/// copied between them.
pub trait CurveModel: Send + Sync {
    /// Forward pass with the blending coefficients for some curve position.
    fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable;

    /// Number of bends the model's layers carry.
    fn num_bends(&self) -> usize;

    /// All bend parameters of the model, layer by layer.
    fn parameters(&self) -> Vec<Parameter>;

    /// The parameters of one bend across all layers, ordered like the
    /// parameters of the structurally matching plain model.
    fn bend_parameters(&self, index: usize) -> Vec<Parameter>;

    /// The blended parameter tensors at the given coefficients, in the same
    /// order as `bend_parameters`.
    fn blended_parameters(&self, coeffs: &[f32]) -> Vec<Tensor>;

    /// Shared buffers of the model, ordered like the buffers of the
    /// structurally matching plain model.
    fn buffers(&self) -> Vec<Buffer> {
        Vec::new()
    }

    /// Sum of the `l2` values of the model's curve layers.
    fn l2(&self) -> f32;

    /// Sets the training mode.
    fn set_training(&mut self, _training: bool) {}

    /// Returns whether the model is in training mode.
    fn is_training(&self) -> bool {
        true
    }
}

// =============================================================================
// CurveNet
// =============================================================================

/// A curve model driven by a coefficient curve.
///
/// `forward_t` evaluates the model at a position `t` on the curve; the plain
/// `Module::forward` draws `t` from U(0, 1), which is how the curve is
/// trained. Endpoint weights are moved in and out with
/// `import_base_parameters` and `export_base_parameters`.
pub struct CurveNet {
    curve: Box<dyn Curve>,
    model: Box<dyn CurveModel>,
}

impl CurveNet {
    /// Pairs a coefficient curve with a curve model.
    ///
    /// # Panics
    ///
    /// Panics if the curve and the model disagree on the number of bends.
    pub fn new(curve: Box<dyn Curve>, model: Box<dyn CurveModel>) -> Self {
        assert_eq!(
            curve.num_bends(),
            model.num_bends(),
            "Curve has {} bends but the model carries {}",
            curve.num_bends(),
            model.num_bends()
        );
        Self { curve, model }
    }

    /// Number of bends.
    pub fn num_bends(&self) -> usize {
        self.model.num_bends()
    }

    /// Blending coefficients at position `t`.
    pub fn coefficients(&self, t: f32) -> Vec<f32> {
        self.curve.coefficients(t)
    }

    /// Forward pass at position `t` on the curve.
    ///
    /// When `t` is `None`, the position is drawn from U(0, 1). Training with
    /// sampled positions optimizes the expected loss along the whole curve.
    pub fn forward_t(&self, input: &Variable, t: Option<f32>) -> Variable {
        let t = t.unwrap_or_else(|| rand::thread_rng().gen());
        let coeffs = self.curve.coefficients(t);
        self.model.forward_t(input, &coeffs)
    }

    /// Copies the parameters of a plain model into the given bend.
    ///
    /// # Panics
    ///
    /// Panics if the parameter counts disagree.
    pub fn import_base_parameters(&self, base: &dyn Module, index: usize) {
        let parameters = self.model.bend_parameters(index);
        let base_parameters = base.parameters();
        assert_eq!(
            parameters.len(),
            base_parameters.len(),
            "Bend has {} parameters but the base model has {}",
            parameters.len(),
            base_parameters.len()
        );
        for (parameter, base_parameter) in parameters.iter().zip(base_parameters.iter()) {
            parameter.update_data(base_parameter.data());
        }
    }

    /// Copies the parameters of the given bend into a plain model.
    ///
    /// # Panics
    ///
    /// Panics if the parameter counts disagree.
    pub fn export_base_parameters(&self, base: &dyn Module, index: usize) {
        let parameters = self.model.bend_parameters(index);
        let base_parameters = base.parameters();
        assert_eq!(
            parameters.len(),
            base_parameters.len(),
            "Bend has {} parameters but the base model has {}",
            parameters.len(),
            base_parameters.len()
        );
        for (parameter, base_parameter) in parameters.iter().zip(base_parameters.iter()) {
            base_parameter.update_data(parameter.data());
        }
    }

    /// Copies the buffers of a plain model into the model's shared buffers.
    ///
    /// Running statistics are not learned along the curve, so a single
    /// import from either endpoint seeds them.
    ///
    /// # Panics
    ///
    /// Panics if the buffer counts disagree.
    pub fn import_base_buffers(&self, base: &dyn Module) {
        let buffers = self.model.buffers();
        let base_buffers = base.buffers();
        assert_eq!(
            buffers.len(),
            base_buffers.len(),
            "Model has {} buffers but the base model has {}",
            buffers.len(),
            base_buffers.len()
        );
        for (buffer, base_buffer) in buffers.iter().zip(base_buffers.iter()) {
            buffer.copy_from(base_buffer);
        }
    }

    /// Places every interior bend on the straight line between the endpoint
    /// bends.
    ///
    /// Bend `j` of `n` becomes `alpha * end + (1 - alpha) * start` with
    /// `alpha = j / (n - 1)`. The usual starting point after importing two
    /// trained endpoints.
    pub fn init_linear(&self) {
        let num_bends = self.model.num_bends();
        let start = self.model.bend_parameters(0);
        let end = self.model.bend_parameters(num_bends - 1);
        for j in 1..num_bends - 1 {
            let alpha = j as f32 / (num_bends - 1) as f32;
            let inner = self.model.bend_parameters(j);
            for (parameter, (first, last)) in inner.iter().zip(start.iter().zip(end.iter())) {
                let blended = last
                    .data()
                    .mul_scalar(alpha)
                    .add(&first.data().mul_scalar(1.0 - alpha))
                    .unwrap();
                parameter.update_data(blended);
            }
        }
    }

    /// The blended parameters at position `t`, flattened into one vector.
    ///
    /// Useful for inspecting how far apart two curve positions are in
    /// weight space.
    pub fn weights(&self, t: f32) -> Vec<f32> {
        let coeffs = self.curve.coefficients(t);
        let mut flat = Vec::new();
        for tensor in self.model.blended_parameters(&coeffs) {
            flat.extend(tensor.to_vec());
        }
        flat
    }

    /// Squared norm of the blended parameters from the latest forward pass.
    pub fn l2(&self) -> f32 {
        self.model.l2()
    }
}

impl Module for CurveNet {
    fn forward(&self, input: &Variable) -> Variable {
        self.forward_t(input, None)
    }

    fn parameters(&self) -> Vec<Parameter> {
        self.model.parameters()
    }

    fn buffers(&self) -> Vec<Buffer> {
        self.model.buffers()
    }

    fn set_training(&mut self, training: bool) {
        self.model.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.model.is_training()
    }

    fn name(&self) -> &'static str {
        "CurveNet"
    }
}

impl std::fmt::Debug for CurveNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveNet")
            .field("num_bends", &self.num_bends())
            .finish()
    }
}

/// Builds the weight penalty used when training a curve: half the weight
/// decay times the squared norm of the blended parameters.
pub fn l2_regularizer(weight_decay: f32) -> impl Fn(&CurveNet) -> f32 {
    move |net| 0.5 * weight_decay * net.l2()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{fix_points, Bezier, PolyChain};
    use crate::layers::CurveLinear;
    use modeconn_nn::layers::Linear;
    use modeconn_tensor::{full, Tensor};

    struct Tiny {
        fc: Linear,
    }

    impl Module for Tiny {
        fn forward(&self, input: &Variable) -> Variable {
            self.fc.forward(input)
        }

        fn parameters(&self) -> Vec<Parameter> {
            self.fc.parameters()
        }
    }

    struct TinyCurve {
        fc: CurveLinear,
    }

    impl CurveModel for TinyCurve {
        fn forward_t(&self, input: &Variable, coeffs: &[f32]) -> Variable {
            self.fc.forward_t(input, coeffs)
        }

        fn num_bends(&self) -> usize {
            self.fc.num_bends()
        }

        fn parameters(&self) -> Vec<Parameter> {
            self.fc.parameters()
        }

        fn bend_parameters(&self, index: usize) -> Vec<Parameter> {
            self.fc.bend_parameters(index)
        }

        fn blended_parameters(&self, coeffs: &[f32]) -> Vec<Tensor> {
            self.fc.blended_parameters(coeffs)
        }

        fn l2(&self) -> f32 {
            self.fc.l2()
        }
    }

    fn net_with_bends(num_bends: usize) -> CurveNet {
        let fixed = fix_points(num_bends, true, true);
        CurveNet::new(
            Box::new(Bezier::new(num_bends)),
            Box::new(TinyCurve {
                fc: CurveLinear::new(2, 2, &fixed),
            }),
        )
    }

    fn assert_close(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{x} vs {y}");
        }
    }

    #[test]
    fn test_import_endpoint_reproduces_base_model() {
        let base = Tiny { fc: Linear::new(2, 2) };
        let net = net_with_bends(3);
        net.import_base_parameters(&base, 0);

        let input = Variable::new(Tensor::from_vec(vec![1.0, -2.0], &[1, 2]).unwrap(), false);
        let from_base = base.forward(&input);
        let from_curve = net.forward_t(&input, Some(0.0));
        assert_close(&from_base.data().to_vec(), &from_curve.data().to_vec());
    }

    #[test]
    fn test_export_roundtrip() {
        let source = Tiny { fc: Linear::new(2, 2) };
        let target = Tiny { fc: Linear::new(2, 2) };
        let net = net_with_bends(3);

        net.import_base_parameters(&source, 2);
        net.export_base_parameters(&target, 2);

        for (p, q) in source.parameters().iter().zip(target.parameters().iter()) {
            assert_eq!(p.data().to_vec(), q.data().to_vec());
        }
    }

    #[test]
    fn test_init_linear_places_interior_on_segment() {
        let net = net_with_bends(3);
        let start = Tiny {
            fc: Linear::from_weights(full(&[2, 2], 0.0), Some(full(&[2], 0.0))),
        };
        let end = Tiny {
            fc: Linear::from_weights(full(&[2, 2], 2.0), Some(full(&[2], 2.0))),
        };
        net.import_base_parameters(&start, 0);
        net.import_base_parameters(&end, 2);
        net.init_linear();

        let middle = net.model.bend_parameters(1);
        assert_eq!(middle[0].data().to_vec(), vec![1.0; 4]);
        assert_eq!(middle[1].data().to_vec(), vec![1.0; 2]);
    }

    #[test]
    fn test_polychain_midpoint_hits_middle_bend() {
        let fixed = fix_points(3, true, true);
        let net = CurveNet::new(
            Box::new(PolyChain::new(3)),
            Box::new(TinyCurve {
                fc: CurveLinear::new(2, 2, &fixed),
            }),
        );
        let base = Tiny { fc: Linear::new(2, 2) };
        net.import_base_parameters(&base, 1);

        let input = Variable::new(Tensor::from_vec(vec![0.5, 1.5], &[1, 2]).unwrap(), false);
        let from_base = base.forward(&input);
        let from_curve = net.forward_t(&input, Some(0.5));
        assert_close(&from_base.data().to_vec(), &from_curve.data().to_vec());
    }

    #[test]
    fn test_forward_samples_position_when_none() {
        let net = net_with_bends(3);
        let input = Variable::new(full(&[4, 2], 1.0), false);
        let output = net.forward(&input);
        assert_eq!(output.shape(), vec![4, 2]);
    }

    #[test]
    fn test_weights_flattens_blended_parameters() {
        let net = net_with_bends(2);
        let flat = net.weights(0.0);
        assert_eq!(flat.len(), 6);

        let bend = net.model.bend_parameters(0);
        let mut expected = bend[0].data().to_vec();
        expected.extend(bend[1].data().to_vec());
        assert_close(&flat, &expected);
    }

    #[test]
    fn test_l2_matches_blended_parameters() {
        let net = net_with_bends(3);
        let input = Variable::new(full(&[1, 2], 1.0), false);

        let coeffs = net.coefficients(0.5);
        let expected: f32 = net
            .model
            .blended_parameters(&coeffs)
            .iter()
            .map(|t| t.to_vec().iter().map(|x| x * x).sum::<f32>())
            .sum();

        net.forward_t(&input, Some(0.5));
        assert!(net.l2() > 0.0);
        assert!((net.l2() - expected).abs() < 1e-4);

        // weight_decay 2.0 makes the regularizer equal to l2 itself
        let regularizer = l2_regularizer(2.0);
        assert!((regularizer(&net) - expected).abs() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "bends")]
    fn test_mismatched_bend_counts_rejected() {
        let fixed = fix_points(3, true, true);
        let _ = CurveNet::new(
            Box::new(Bezier::new(2)),
            Box::new(TinyCurve {
                fc: CurveLinear::new(2, 2, &fixed),
            }),
        );
    }
}
